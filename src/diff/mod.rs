// Tue Feb 17 2026 - Alex

pub mod engine;
pub mod normalize;
pub mod report;

pub use engine::{diff, diff_rows, DiffEngine};
pub use normalize::PathNormalizer;
pub use report::{signed_delta, Classification, Comparison, DiffEntry, DiffReport};
