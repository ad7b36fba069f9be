// Tue Feb 17 2026 - Alex

use crate::advisory::{Advisory, AdvisoryPass};
use crate::config::Config;
use crate::linkmap::{Diagnostic, Snapshot, SourceMetadata};
use crate::rollup::{aggregate, top_symbols, RollupCache, RollupModel, SymbolRow};
use serde::Serialize;

/// Everything an `analyze` run reports about one snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub source: SourceMetadata,
    pub total_size: u64,
    pub object_file_count: usize,
    pub section_count: usize,
    pub symbol_count: usize,
    pub rollups: RollupModel,
    pub top_symbols: Vec<SymbolRow>,
    pub diagnostics: Vec<Diagnostic>,
    pub advisories: Vec<Advisory>,
}

impl AnalysisReport {
    pub fn build(snapshot: &Snapshot, config: &Config) -> Self {
        let rollups = aggregate(snapshot, config.rollup.top_n);
        Self::assemble(snapshot, config, rollups)
    }

    pub fn build_cached(snapshot: &Snapshot, config: &Config, cache: &RollupCache) -> Self {
        let rollups = cache.get_or_compute(snapshot, config.rollup.top_n);
        Self::assemble(snapshot, config, (*rollups).clone())
    }

    fn assemble(snapshot: &Snapshot, config: &Config, rollups: RollupModel) -> Self {
        // Advisories look at every row, not just the ones that survived top_n.
        let full = match config.rollup.top_n {
            None => rollups.clone(),
            Some(_) => aggregate(snapshot, None),
        };
        let advisories = AdvisoryPass::new(config.advisory.clone()).run_with_snapshot(snapshot, &full);

        Self {
            source: snapshot.source().clone(),
            total_size: snapshot.total_size(),
            object_file_count: snapshot.object_files().len(),
            section_count: snapshot.sections().len(),
            symbol_count: snapshot.symbols().len(),
            rollups,
            top_symbols: top_symbols(snapshot, config.rollup.top_symbols),
            diagnostics: snapshot.diagnostics().to_vec(),
            advisories,
        }
    }

    pub fn label(&self) -> String {
        self.source.label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linkmap::parse;

    const MAP: &str = "\
# Path: /build/App
# Arch: arm64
# Object files:
[0] /p/libFoo.a(a.o)
[1] main.o
[2] /p/libBar.a(b.o)
# Sections:
0x1000 0x300 __TEXT __text
# Symbols:
0x1000 0x100 [0] _a
0x1100 0x180 [1] _main
0x1280 0x80 [2] _b
";

    #[test]
    fn test_report_counts_and_truncation() {
        let snapshot = parse(MAP).unwrap();
        let config = Config::default().with_top_n(Some(1));
        let report = AnalysisReport::build(&snapshot, &config);

        assert_eq!(report.label(), "/build/App");
        assert_eq!(report.total_size, 0x300);
        assert_eq!(report.object_file_count, 3);
        assert_eq!(report.section_count, 1);
        assert_eq!(report.symbol_count, 3);
        assert_eq!(report.rollups.by_library.len(), 2);
        assert_eq!(report.top_symbols[0].name, "_main");
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_cached_build_matches_plain_build() {
        let snapshot = parse(MAP).unwrap();
        let config = Config::default();
        let cache = RollupCache::new();

        let plain = AnalysisReport::build(&snapshot, &config);
        let cached = AnalysisReport::build_cached(&snapshot, &config, &cache);
        assert_eq!(plain.rollups, cached.rollups);
        assert_eq!(cache.len(), 1);
    }
}
