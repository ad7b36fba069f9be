// Mon Feb 16 2026 - Alex

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParseErrorKind {
    MalformedHeader,
    UnexpectedTableOrder,
    SizeFieldNotInteger,
    DanglingReference,
    AddressRegression,
    DuplicateFileIndex,
    MalformedRow,
    SizeOverflow,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParseErrorKind::MalformedHeader => "malformed header",
            ParseErrorKind::UnexpectedTableOrder => "unexpected table order",
            ParseErrorKind::SizeFieldNotInteger => "numeric field is not an integer",
            ParseErrorKind::DanglingReference => "dangling file reference",
            ParseErrorKind::AddressRegression => "address regression",
            ParseErrorKind::DuplicateFileIndex => "duplicate object file index",
            ParseErrorKind::MalformedRow => "malformed row",
            ParseErrorKind::SizeOverflow => "symbol sizes overflow the total",
        };
        write!(f, "{}", name)
    }
}

/// Fatal problem with the link map text itself. No partial snapshot survives it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at line {line}: `{token}`")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub token: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line: usize, token: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            token: token.into(),
        }
    }
}

/// A symbol row pointing at an object file index that was never declared.
/// Usually means the map was truncated or corrupted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("symbol `{symbol}` at line {line} references unknown object file [{file_index}]")]
pub struct ReferenceError {
    pub file_index: u32,
    pub line: usize,
    pub symbol: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkMapError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

impl LinkMapError {
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            LinkMapError::Parse(e) => e.kind,
            LinkMapError::Reference(_) => ParseErrorKind::DanglingReference,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            LinkMapError::Parse(e) => e.line,
            LinkMapError::Reference(e) => e.line,
        }
    }

    pub fn token(&self) -> String {
        match self {
            LinkMapError::Parse(e) => e.token.clone(),
            LinkMapError::Reference(e) => format!("[{}]", e.file_index),
        }
    }
}
