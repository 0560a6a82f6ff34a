use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::exhibits::{ExhibitSpec, ReferenceTable};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Inline exhibit map: citation key -> label and optional URL
    #[serde(default)]
    pub exhibits: BTreeMap<String, ExhibitSpec>,

    /// Exhibit map file, relative to the configuration file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exhibits_file: Option<String>,

    /// Relabeling options
    #[serde(default)]
    pub relabel: RelabelConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the rewriting pass and its output
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RelabelConfig {
    /// Attach the exhibit URL to the rewritten label
    #[serde(default = "default_true")]
    pub attach_links: bool,

    /// Suffix inserted before the extension of output documents
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Extension of document files picked up in folder mode
    #[serde(default = "default_document_extension")]
    pub document_extension: String,
}

impl Default for RelabelConfig {
    fn default() -> Self {
        Self {
            attach_links: true,
            output_suffix: default_output_suffix(),
            document_extension: default_document_extension(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_output_suffix() -> String {
    "relabeled".to_string()
}

fn default_document_extension() -> String {
    "json".to_string()
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        let suffix = &self.relabel.output_suffix;
        if suffix.is_empty() {
            return Err(AppError::Config("relabel.output_suffix must not be empty".to_string()));
        }
        if suffix.contains(['/', '\\']) {
            return Err(AppError::Config(format!(
                "relabel.output_suffix must not contain path separators: {}",
                suffix
            )));
        }

        let extension = self.relabel.document_extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(AppError::Config(
                "relabel.document_extension must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the exhibit file path against the config file's directory
    pub fn exhibits_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.exhibits_file.as_ref().map(|file| {
            let path = Path::new(file);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                config_dir.join(path)
            }
        })
    }

    /// Build the validated reference table from inline and file exhibits
    pub fn reference_table(&self, config_dir: &Path) -> Result<ReferenceTable, AppError> {
        let mut table = ReferenceTable::from_specs(self.exhibits.clone());

        if let Some(path) = self.exhibits_path(config_dir) {
            let from_file = ReferenceTable::from_json_file(&path)?;
            table = table.merge(from_file)?;
        }

        table.validate()?;
        Ok(table)
    }
}
