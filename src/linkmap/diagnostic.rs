// Mon Feb 16 2026 - Alex

use serde::Serialize;
use std::fmt;

/// Non-fatal findings attached to a snapshot while it is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Symbols attributed to a section add up to more than the section declares.
    ToleranceViolation {
        section: String,
        declared: u64,
        observed: u64,
        tolerance: u64,
    },
    /// The symbol had no explicit size and the next symbol starts at the same address.
    SharedAddress {
        line: usize,
        address: u64,
        symbol: String,
    },
    /// No explicit size and nothing bounds it: last symbol outside every section.
    UnboundedSize {
        line: usize,
        address: u64,
        symbol: String,
    },
}

impl Diagnostic {
    pub fn line(&self) -> Option<usize> {
        match self {
            Diagnostic::ToleranceViolation { .. } => None,
            Diagnostic::SharedAddress { line, .. } | Diagnostic::UnboundedSize { line, .. } => Some(*line),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ToleranceViolation { section, declared, observed, tolerance } => write!(
                f,
                "section {} declares 0x{:x} bytes but its symbols sum to 0x{:x} (tolerance 0x{:x})",
                section, declared, observed, tolerance
            ),
            Diagnostic::SharedAddress { line, address, symbol } => write!(
                f,
                "line {}: {} shares address 0x{:x} with the next symbol, size taken as 0",
                line, symbol, address
            ),
            Diagnostic::UnboundedSize { line, address, symbol } => write!(
                f,
                "line {}: {} at 0x{:x} is outside every section and has no size, size taken as 0",
                line, symbol, address
            ),
        }
    }
}
