// Tue Feb 17 2026 - Alex

use crate::config::AdvisoryConfig;
use crate::linkmap::library::{file_name, library_key, split_archive_member};
use crate::linkmap::Snapshot;
use crate::rollup::{RollupModel, RollupRow, OTHERS_KEY};
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

/// Advisories are heuristics, never invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvisoryKind {
    OversizeLibrary { key: String, size: u64, share: f64 },
    OversizeFile { key: String, size: u64, share: f64 },
    /// Same object file name linked from several libraries with similar sizes.
    DuplicateObject { member: String, libraries: Vec<String>, sizes: Vec<u64> },
    /// Same symbol name defined by several object files.
    DuplicateSymbol { name: String, files: Vec<String>, size: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    #[serde(flatten)]
    pub kind: AdvisoryKind,
    pub confidence: Confidence,
}

impl Advisory {
    fn low(kind: AdvisoryKind) -> Self {
        Self {
            kind,
            confidence: Confidence::Low,
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AdvisoryKind::OversizeLibrary { key, size, share } => {
                write!(f, "library {} takes {:.1}% ({} bytes)", key, share * 100.0, size)
            }
            AdvisoryKind::OversizeFile { key, size, share } => {
                write!(f, "object file {} takes {:.1}% ({} bytes)", key, share * 100.0, size)
            }
            AdvisoryKind::DuplicateObject { member, libraries, .. } => {
                write!(f, "{} appears in {}", member, libraries.join(", "))
            }
            AdvisoryKind::DuplicateSymbol { name, files, size } => {
                write!(f, "{} ({} bytes) is defined in {} files", name, size, files.len())
            }
        }
    }
}

pub struct AdvisoryPass {
    config: AdvisoryConfig,
}

impl AdvisoryPass {
    pub fn new(config: AdvisoryConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, model: &RollupModel) -> Vec<Advisory> {
        if !self.config.enabled {
            return Vec::new();
        }

        let mut advisories = Vec::new();

        for row in self.oversize(&model.by_library) {
            advisories.push(Advisory::low(AdvisoryKind::OversizeLibrary {
                key: row.key.clone(),
                size: row.size,
                share: row.percent_of_total,
            }));
        }
        for row in self.oversize(&model.by_file) {
            advisories.push(Advisory::low(AdvisoryKind::OversizeFile {
                key: row.key.clone(),
                size: row.size,
                share: row.percent_of_total,
            }));
        }

        advisories.extend(self.duplicate_objects(&model.by_file));
        advisories
    }

    pub fn run_with_snapshot(&self, snapshot: &Snapshot, model: &RollupModel) -> Vec<Advisory> {
        let mut advisories = self.run(model);
        if self.config.enabled {
            advisories.extend(self.duplicate_symbols(snapshot));
        }
        advisories
    }

    fn oversize<'a>(&self, rows: &'a [RollupRow]) -> impl Iterator<Item = &'a RollupRow> + 'a {
        let ratio = self.config.oversize_ratio;
        rows.iter()
            .filter(move |r| r.key != OTHERS_KEY && r.size > 0 && r.percent_of_total >= ratio)
    }

    fn duplicate_objects(&self, files: &[RollupRow]) -> Vec<Advisory> {
        let groups = files
            .iter()
            .filter(|r| r.key != OTHERS_KEY)
            .map(|r| {
                let member = match split_archive_member(&r.key) {
                    Some((_, member)) => member,
                    None => file_name(&r.key),
                };
                (member.to_string(), (library_key(&r.key), r.size))
            })
            .into_group_map();

        groups
            .into_iter()
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .filter_map(|(member, mut owners)| {
                owners.sort();
                owners.dedup_by(|a, b| a.0 == b.0);
                if owners.len() < 2 {
                    return None;
                }
                let min = owners.iter().map(|o| o.1).min()?;
                let max = owners.iter().map(|o| o.1).max()?;
                if max < self.config.min_duplicate_size || (min as f64) < max as f64 * self.config.similarity_ratio {
                    return None;
                }
                let (libraries, sizes) = owners.into_iter().unzip();
                Some(Advisory::low(AdvisoryKind::DuplicateObject { member, libraries, sizes }))
            })
            .collect()
    }

    fn duplicate_symbols(&self, snapshot: &Snapshot) -> Vec<Advisory> {
        snapshot
            .symbols()
            .iter()
            .filter(|s| s.size >= self.config.min_duplicate_size && !s.name.is_empty() && !s.name.contains(": "))
            .map(|s| (s.name.as_str(), s))
            .into_group_map()
            .into_iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .filter_map(|(name, defs)| {
                let files: Vec<String> = defs
                    .iter()
                    .map(|s| s.file_index)
                    .unique()
                    .filter_map(|idx| snapshot.object_file(idx).map(|f| f.path.clone()))
                    .collect();
                if files.len() < 2 {
                    return None;
                }
                let size = defs.iter().map(|s| s.size).max()?;
                Some(Advisory::low(AdvisoryKind::DuplicateSymbol {
                    name: name.to_string(),
                    files,
                    size,
                }))
            })
            .collect()
    }
}

impl Default for AdvisoryPass {
    fn default() -> Self {
        Self::new(AdvisoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linkmap::parse;
    use crate::rollup::aggregate;

    const MAP: &str = "\
# Object files:
[0] /p/libAnalytics.a(Reachability.o)
[1] /p/libNetwork.a(Reachability.o)
[2] main.o
[3] /p/libUtil.a(Small.o)
# Symbols:
0x1000 0x800 [0] _OBJC_CLASS_$_Reachability
0x1800 0x7C0 [1] _OBJC_CLASS_$_Reachability
0x2000 0x4000 [2] _main
0x6000 0x10 [3] _tiny
";

    fn config() -> AdvisoryConfig {
        AdvisoryConfig {
            enabled: true,
            oversize_ratio: 0.5,
            similarity_ratio: 0.9,
            min_duplicate_size: 0x100,
        }
    }

    #[test]
    fn test_flags_duplicate_objects_and_oversize() {
        let snapshot = parse(MAP).unwrap();
        let model = aggregate(&snapshot, None);
        let advisories = AdvisoryPass::new(config()).run(&model);

        assert!(advisories.iter().all(|a| a.confidence == Confidence::Low));
        assert!(advisories.iter().any(|a| matches!(
            &a.kind,
            AdvisoryKind::OversizeLibrary { key, .. } if key == "<main target>"
        )));
        assert!(advisories.iter().any(|a| matches!(
            &a.kind,
            AdvisoryKind::DuplicateObject { member, libraries, .. }
                if member == "Reachability.o" && libraries == &vec!["libAnalytics".to_string(), "libNetwork".to_string()]
        )));
    }

    #[test]
    fn test_flags_duplicate_symbols() {
        let snapshot = parse(MAP).unwrap();
        let model = aggregate(&snapshot, None);
        let advisories = AdvisoryPass::new(config()).run_with_snapshot(&snapshot, &model);

        let dup = advisories
            .iter()
            .find_map(|a| match &a.kind {
                AdvisoryKind::DuplicateSymbol { name, files, size } => Some((name, files.len(), *size)),
                _ => None,
            })
            .unwrap();
        assert_eq!(dup, (&"_OBJC_CLASS_$_Reachability".to_string(), 2, 0x800));
    }

    #[test]
    fn test_dissimilar_sizes_are_not_duplicates() {
        let text = MAP.replace("0x1800 0x7C0 [1]", "0x1800 0x200 [1]");
        let snapshot = parse(&text).unwrap();
        let advisories = AdvisoryPass::new(config()).run(&aggregate(&snapshot, None));
        assert!(!advisories
            .iter()
            .any(|a| matches!(a.kind, AdvisoryKind::DuplicateObject { .. })));
    }

    #[test]
    fn test_disabled_pass_is_silent() {
        let snapshot = parse(MAP).unwrap();
        let mut cfg = config();
        cfg.enabled = false;
        let pass = AdvisoryPass::new(cfg);
        assert!(pass.run_with_snapshot(&snapshot, &aggregate(&snapshot, None)).is_empty());
    }
}
