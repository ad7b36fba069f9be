// Tue Feb 17 2026 - Alex

pub mod advisory;
pub mod batch;
pub mod config;
pub mod demangle;
pub mod diff;
pub mod history;
pub mod linkmap;
pub mod output;
pub mod report;
pub mod rollup;
pub mod ui;

pub use advisory::{Advisory, AdvisoryPass};
pub use batch::{parse_batch, BatchInput, BatchOutcome};
pub use config::Config;
pub use demangle::{Demangle, ItaniumDemangler};
pub use diff::{diff, Comparison, DiffEngine, DiffReport};
pub use history::{HistoryEntry, HistoryLog};
pub use linkmap::{parse, LinkMapError, LinkMapParser, Snapshot};
pub use output::{Renderable, Renderer};
pub use report::AnalysisReport;
pub use rollup::{aggregate, RollupModel};
