// Tue Feb 17 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Added,
    Removed,
    Grew,
    Shrank,
    Unchanged,
}

impl Classification {
    pub fn classify(baseline: u64, current: u64) -> Self {
        if baseline == current {
            Classification::Unchanged
        } else if baseline == 0 {
            Classification::Added
        } else if current == 0 {
            Classification::Removed
        } else if current > baseline {
            Classification::Grew
        } else {
            Classification::Shrank
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Added => "added",
            Classification::Removed => "removed",
            Classification::Grew => "grew",
            Classification::Shrank => "shrank",
            Classification::Unchanged => "unchanged",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `current - baseline`, clamped to the `i64` range so the sign always
/// agrees with [`Classification::classify`].
pub fn signed_delta(baseline: u64, current: u64) -> i64 {
    let delta = current as i128 - baseline as i128;
    delta.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffEntry {
    pub key: String,
    pub baseline_size: u64,
    pub current_size: u64,
    pub delta: i64,
    pub classification: Classification,
}

impl DiffEntry {
    pub fn new(key: &str, baseline_size: u64, current_size: u64) -> Self {
        Self {
            key: key.to_string(),
            baseline_size,
            current_size,
            delta: signed_delta(baseline_size, current_size),
            classification: Classification::classify(baseline_size, current_size),
        }
    }

    /// Relative change against the baseline; `None` when there was no baseline.
    pub fn percent_change(&self) -> Option<f64> {
        if self.baseline_size == 0 {
            None
        } else {
            Some(self.delta as f64 / self.baseline_size as f64)
        }
    }
}

impl fmt::Display for DiffEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} ({:+}) [{}]",
            self.key, self.baseline_size, self.current_size, self.delta, self.classification
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    pub entries: Vec<DiffEntry>,
    pub total_baseline: u64,
    pub total_current: u64,
    pub total_delta: i64,
}

impl DiffReport {
    /// Orders entries by absolute delta descending, key ascending, and derives
    /// the totals from them.
    pub fn from_entries(mut entries: Vec<DiffEntry>) -> Self {
        entries.sort_by(|a, b| {
            b.delta
                .unsigned_abs()
                .cmp(&a.delta.unsigned_abs())
                .then_with(|| a.key.cmp(&b.key))
        });

        let total_baseline = entries.iter().fold(0u64, |acc, e| acc.saturating_add(e.baseline_size));
        let total_current = entries.iter().fold(0u64, |acc, e| acc.saturating_add(e.current_size));

        Self {
            entries,
            total_baseline,
            total_current,
            total_delta: signed_delta(total_baseline, total_current),
        }
    }

    pub fn get(&self, key: &str) -> Option<&DiffEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn top(&self, n: usize) -> &[DiffEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn count(&self, classification: Classification) -> usize {
        self.entries
            .iter()
            .filter(|e| e.classification == classification)
            .count()
    }

    pub fn changed(&self) -> impl Iterator<Item = &DiffEntry> {
        self.entries
            .iter()
            .filter(|e| e.classification != Classification::Unchanged)
    }

    pub fn has_changes(&self) -> bool {
        self.changed().next().is_some()
    }

    pub fn total_percent_change(&self) -> Option<f64> {
        if self.total_baseline == 0 {
            None
        } else {
            Some(self.total_delta as f64 / self.total_baseline as f64)
        }
    }

    /// `sum(delta) == total_current - total_baseline`.
    pub fn reconciles(&self) -> bool {
        self.entries.iter().map(|e| e.delta as i128).sum::<i128>() == self.total_delta as i128
    }
}

/// Library, file and section level diffs of the same two builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub baseline: String,
    pub current: String,
    pub libraries: DiffReport,
    pub files: DiffReport,
    pub sections: DiffReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_rules() {
        assert_eq!(Classification::classify(0, 0), Classification::Unchanged);
        assert_eq!(Classification::classify(5, 5), Classification::Unchanged);
        assert_eq!(Classification::classify(0, 3), Classification::Added);
        assert_eq!(Classification::classify(3, 0), Classification::Removed);
        assert_eq!(Classification::classify(3, 4), Classification::Grew);
        assert_eq!(Classification::classify(4, 3), Classification::Shrank);
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(DiffEntry::new("a", 0, 10).percent_change(), None);
        assert_eq!(DiffEntry::new("a", 100, 120).percent_change(), Some(0.2));
        assert_eq!(DiffEntry::new("a", 100, 50).percent_change(), Some(-0.5));
    }

    #[test]
    fn test_delta_sign_matches_classification_for_huge_sizes() {
        let grew = DiffEntry::new("a", 0, u64::MAX);
        assert_eq!(grew.classification, Classification::Added);
        assert_eq!(grew.delta, i64::MAX);

        let shrank = DiffEntry::new("b", u64::MAX, 1);
        assert_eq!(shrank.classification, Classification::Shrank);
        assert_eq!(shrank.delta, i64::MIN);

        let near = DiffEntry::new("c", u64::MAX - 4, u64::MAX);
        assert_eq!(near.classification, Classification::Grew);
        assert_eq!(near.delta, 4);
    }

    #[test]
    fn test_huge_entries_sort_by_magnitude() {
        let report = DiffReport::from_entries(vec![
            DiffEntry::new("small", 10, 20),
            DiffEntry::new("huge", 1, u64::MAX),
            DiffEntry::new("same", 5, 5),
        ]);
        let keys: Vec<&str> = report.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["huge", "small", "same"]);
        assert_eq!(report.total_baseline, 16);
        assert_eq!(report.total_current, u64::MAX);
        assert_eq!(report.total_delta, i64::MAX);
    }

    #[test]
    fn test_entries_sorted_by_absolute_delta_then_key() {
        let report = DiffReport::from_entries(vec![
            DiffEntry::new("small", 10, 12),
            DiffEntry::new("b", 50, 0),
            DiffEntry::new("a", 0, 50),
            DiffEntry::new("same", 7, 7),
        ]);
        let keys: Vec<&str> = report.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "small", "same"]);
        assert_eq!(report.total_delta, 2);
        assert!(report.reconciles());
        assert_eq!(report.top(2).len(), 2);
        assert_eq!(report.top(10).len(), 4);
    }
}
