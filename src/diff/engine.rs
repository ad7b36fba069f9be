// Tue Feb 17 2026 - Alex

use crate::config::DiffConfig;
use crate::diff::normalize::PathNormalizer;
use crate::diff::report::{Comparison, DiffEntry, DiffReport};
use crate::rollup::{RollupModel, RollupRow};
use indexmap::IndexMap;

/// Diffs two keyed size views. Keys present on one side only count as 0 on
/// the other; repeated keys within a side are summed.
pub fn diff<'a, B, C>(baseline: B, current: C) -> DiffReport
where
    B: IntoIterator<Item = (&'a str, u64)>,
    C: IntoIterator<Item = (&'a str, u64)>,
{
    let mut sides: IndexMap<&'a str, (u64, u64)> = IndexMap::new();
    for (key, size) in baseline {
        let side = &mut sides.entry(key).or_insert((0, 0)).0;
        *side = side.saturating_add(size);
    }
    for (key, size) in current {
        let side = &mut sides.entry(key).or_insert((0, 0)).1;
        *side = side.saturating_add(size);
    }

    let entries = sides
        .into_iter()
        .map(|(key, (base, cur))| DiffEntry::new(key, base, cur))
        .collect();

    DiffReport::from_entries(entries)
}

pub fn diff_rows(baseline: &[RollupRow], current: &[RollupRow]) -> DiffReport {
    diff(
        baseline.iter().map(|r| (r.key.as_str(), r.size)),
        current.iter().map(|r| (r.key.as_str(), r.size)),
    )
}

/// Compares rollups of two builds. Give it untruncated rollups when the keys
/// matter; an `<others>` row is diffed like any other key.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    normalizer: PathNormalizer,
}

impl DiffEngine {
    pub fn new(normalizer: PathNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn from_config(config: &DiffConfig) -> Result<Self, regex::Error> {
        Ok(Self::new(PathNormalizer::with_patterns(
            &config.strip_patterns,
            config.use_default_patterns,
        )?))
    }

    pub fn diff_libraries(&self, baseline: &RollupModel, current: &RollupModel) -> DiffReport {
        diff_rows(&baseline.by_library, &current.by_library)
    }

    pub fn diff_sections(&self, baseline: &RollupModel, current: &RollupModel) -> DiffReport {
        diff_rows(&baseline.by_section, &current.by_section)
    }

    pub fn diff_files(&self, baseline: &RollupModel, current: &RollupModel) -> DiffReport {
        let base = self.normalized(&baseline.by_file);
        let cur = self.normalized(&current.by_file);
        diff(
            base.iter().map(|(k, s)| (k.as_str(), *s)),
            cur.iter().map(|(k, s)| (k.as_str(), *s)),
        )
    }

    pub fn compare(
        &self,
        baseline_label: &str,
        baseline: &RollupModel,
        current_label: &str,
        current: &RollupModel,
    ) -> Comparison {
        let comparison = Comparison {
            baseline: baseline_label.to_string(),
            current: current_label.to_string(),
            libraries: self.diff_libraries(baseline, current),
            files: self.diff_files(baseline, current),
            sections: self.diff_sections(baseline, current),
        };

        log::debug!(
            "compared {} -> {}: {:+} bytes across {} libraries",
            baseline_label,
            current_label,
            comparison.libraries.total_delta,
            comparison.libraries.entries.len()
        );

        comparison
    }

    fn normalized(&self, rows: &[RollupRow]) -> Vec<(String, u64)> {
        rows.iter()
            .map(|r| (self.normalizer.normalize(&r.key), r.size))
            .collect()
    }
}
