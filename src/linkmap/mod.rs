// Mon Feb 16 2026 - Alex

pub mod diagnostic;
pub mod error;
pub mod header;
pub mod library;
pub mod parser;
pub mod snapshot;

pub use diagnostic::Diagnostic;
pub use error::{LinkMapError, ParseError, ParseErrorKind, ReferenceError};
pub use library::{library_key, MAIN_TARGET};
pub use parser::{parse, LinkMapParser};
pub use snapshot::{
    ObjectFileEntry, OpaqueBlock, RawSymbol, SectionEntry, SectionRef, Snapshot, SnapshotBuilder, SourceMetadata,
    SymbolEntry, UNCLASSIFIED,
};
