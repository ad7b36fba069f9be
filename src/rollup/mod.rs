// Mon Feb 16 2026 - Alex

pub mod aggregator;
pub mod cache;
pub mod symbols;

pub use aggregator::{aggregate, RollupModel, RollupRow, OTHERS_KEY};
pub use cache::RollupCache;
pub use symbols::{top_symbols, SymbolRow};
