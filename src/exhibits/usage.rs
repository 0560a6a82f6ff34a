use std::collections::HashSet;

use log::warn;

use crate::exhibits::reference_table::ReferenceTable;

// @module: Exhibit usage tracking across a run

/// Keys consumed during a run, plus the misses seen along the way.
///
/// Owned by the run rather than the table, so the same table can drive
/// several independent runs.
#[derive(Debug, Default, Clone)]
pub struct UsageTracker {
    used: HashSet<String>,
    misses: Vec<String>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_used(&mut self, key: &str) {
        if !self.used.contains(key) {
            self.used.insert(key.to_string());
        }
    }

    pub fn record_miss(&mut self, key: &str) {
        self.misses.push(key.to_string());
    }

    pub fn is_used(&self, key: &str) -> bool {
        self.used.contains(key)
    }

    pub fn used_count(&self) -> usize {
        self.used.len()
    }

    /// Missed keys in scan order, repeats included
    pub fn misses(&self) -> &[String] {
        &self.misses
    }

    /// Table keys never substituted, sorted
    pub fn unused_keys(&self, table: &ReferenceTable) -> Vec<String> {
        table
            .all_keys()
            .filter(|key| !self.used.contains(*key))
            .map(str::to_string)
            .collect()
    }

    /// Log every unused key once and return them
    pub fn report_unused(&self, table: &ReferenceTable) -> Vec<String> {
        let unused = self.unused_keys(table);
        for key in &unused {
            warn!("Unused exhibit: {}", key);
        }
        unused
    }
}
