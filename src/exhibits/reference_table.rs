/*!
 * Exhibit reference table.
 *
 * Maps the raw citation key (the digit-leading remainder of a citation) to the
 * canonical label and optional document URL. The table is built once before a
 * run and never mutated while documents are being rewritten.
 */

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs;
use std::path::Path;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::ReferenceError;
use crate::exhibits::matcher::is_quote_char;

/// Labels that re-scan as an id token, so later runs can update them
static RESCANNABLE_LABEL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\w+(?:\s+p\d+)?$").expect("Invalid label regex")
});

/// A single exhibit the citations can resolve to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    /// Exact citation key, case and whitespace sensitive
    pub key: String,

    /// Canonical label substituted into the citation (e.g. "AA p11")
    pub label: String,

    /// Link attached to the rewritten label, if any
    pub url: Option<String>,
}

impl ReferenceEntry {
    pub fn new(key: impl Into<String>, label: impl Into<String>, url: Option<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            url,
        }
    }

    /// Check the entry can be produced by a citation and rendered back
    pub fn validate(&self) -> Result<(), ReferenceError> {
        if self.key.is_empty() {
            return Err(ReferenceError::InvalidKey {
                key: self.key.clone(),
                reason: "key is empty",
            });
        }
        if !self.key.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(ReferenceError::InvalidKey {
                key: self.key.clone(),
                reason: "key must start with a digit",
            });
        }
        if self.key.chars().any(is_quote_char) {
            return Err(ReferenceError::InvalidKey {
                key: self.key.clone(),
                reason: "key must not contain quote characters",
            });
        }
        if self.label.trim().is_empty() {
            return Err(ReferenceError::EmptyLabel(self.key.clone()));
        }
        if let Some(url) = &self.url {
            Url::parse(url).map_err(|e| ReferenceError::InvalidUrl {
                key: self.key.clone(),
                url: url.clone(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Whether a rewritten citation with this label is recognised again
    pub fn label_is_rescannable(&self) -> bool {
        RESCANNABLE_LABEL_REGEX.is_match(&self.label)
    }
}

/// Exhibit map value as found in configuration and exhibit map files.
///
/// `text` is accepted as an alias of `label` so the exhibit map printed by
/// the exhibit joiner can be used as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExhibitSpec {
    #[serde(alias = "text")]
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Immutable lookup table from citation key to exhibit
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    entries: BTreeMap<String, ReferenceEntry>,
}

impl ReferenceTable {
    /// Build a table, rejecting duplicate keys
    pub fn from_entries<I>(entries: I) -> Result<Self, ReferenceError>
    where
        I: IntoIterator<Item = ReferenceEntry>,
    {
        let mut table = Self::default();
        for entry in entries {
            table.insert(entry)?;
        }
        Ok(table)
    }

    /// Build a table from an exhibit map keyed by citation key
    pub fn from_specs(specs: BTreeMap<String, ExhibitSpec>) -> Self {
        let entries = specs
            .into_iter()
            .map(|(key, spec)| {
                let entry = ReferenceEntry::new(key.clone(), spec.label, spec.url);
                (key, entry)
            })
            .collect();
        Self { entries }
    }

    /// Parse an exhibit map JSON object
    pub fn from_json_str(json: &str) -> Result<Self, ReferenceError> {
        let specs: BTreeMap<String, ExhibitSpec> =
            serde_json::from_str(json).map_err(|e| ReferenceError::Parse(e.to_string()))?;
        Ok(Self::from_specs(specs))
    }

    /// Load an exhibit map JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ReferenceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ReferenceError::Parse(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    fn insert(&mut self, entry: ReferenceEntry) -> Result<(), ReferenceError> {
        match self.entries.entry(entry.key.clone()) {
            Entry::Occupied(_) => Err(ReferenceError::DuplicateKey(entry.key)),
            Entry::Vacant(slot) => {
                slot.insert(entry);
                Ok(())
            }
        }
    }

    /// Union of both tables; a key defined in both is an error
    pub fn merge(mut self, other: ReferenceTable) -> Result<Self, ReferenceError> {
        for entry in other.entries.into_values() {
            self.insert(entry)?;
        }
        Ok(self)
    }

    /// Validate every entry.
    ///
    /// Labels that will not be recognised on a later run only produce a
    /// warning: the rewrite still happens, it just cannot be refreshed.
    pub fn validate(&self) -> Result<(), ReferenceError> {
        for entry in self.entries.values() {
            entry.validate()?;
            if !entry.label_is_rescannable() {
                warn!(
                    "Label '{}' for exhibit '{}' will not be recognised when re-running",
                    entry.label, entry.key
                );
            }
        }
        Ok(())
    }

    pub fn lookup(&self, key: &str) -> Option<&ReferenceEntry> {
        self.entries.get(key)
    }

    /// All keys, in sorted order
    pub fn all_keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
