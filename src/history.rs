// Tue Feb 17 2026 - Alex

use crate::diff::{diff_rows, DiffReport};
use crate::rollup::{RollupModel, RollupRow};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub total_size: u64,
    pub libraries: Vec<RollupRow>,
}

impl HistoryEntry {
    pub fn from_rollup(version: &str, timestamp: DateTime<Utc>, model: &RollupModel) -> Self {
        Self {
            version: version.to_string(),
            timestamp,
            total_size: model.total_size,
            libraries: model.by_library.clone(),
        }
    }
}

/// Size records of past builds, newest first. Owned by the caller; nothing
/// here touches disk unless `load`/`save` are called.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read history {}", path.display()))?;
        let mut log: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse history {}", path.display()))?;
        log.sort();
        Ok(log)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("failed to write history {}", path.display()))
    }

    /// Records `entry`, replacing any entry with the same version.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.insert(entry);
        self.sort();
    }

    /// Folds `other` into this log with the same rule as `append`; entries
    /// from `other` win on equal versions.
    pub fn merge(&mut self, other: HistoryLog) {
        for entry in other.entries {
            self.insert(entry);
        }
        self.sort();
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn find(&self, version: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.version == version)
    }

    /// Library-level diff between two recorded versions.
    pub fn diff_versions(&self, baseline: &str, current: &str) -> Option<DiffReport> {
        let base = self.find(baseline)?;
        let cur = self.find(current)?;
        Some(diff_rows(&base.libraries, &cur.libraries))
    }

    fn insert(&mut self, entry: HistoryEntry) {
        match self.entries.iter_mut().find(|e| e.version == entry.version) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| a.version.cmp(&b.version)));
    }
}
