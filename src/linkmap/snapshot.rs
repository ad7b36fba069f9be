// Mon Feb 16 2026 - Alex

use crate::linkmap::diagnostic::Diagnostic;
use crate::linkmap::error::{LinkMapError, ParseError, ParseErrorKind, ReferenceError};
use crate::linkmap::library::library_key;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub const UNCLASSIFIED: &str = "<unclassified>";

static NEXT_SNAPSHOT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectFileEntry {
    pub index: u32,
    pub path: String,
    pub library_key: String,
    /// Sum of the sizes of the symbols this file contributes.
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionEntry {
    pub segment: String,
    pub name: String,
    pub start_address: u64,
    pub size: u64,
}

impl SectionEntry {
    pub fn new(segment: &str, name: &str, start_address: u64, size: u64) -> Self {
        Self {
            segment: segment.to_string(),
            name: name.to_string(),
            start_address,
            size,
        }
    }

    pub fn end_address(&self) -> u64 {
        self.start_address.saturating_add(self.size)
    }

    pub fn contains(&self, address: u64) -> bool {
        address >= self.start_address && address < self.end_address()
    }

    pub fn key(&self) -> String {
        format!("{},{}", self.segment, self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum SectionRef {
    Known(usize),
    Unclassified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolEntry {
    pub address: u64,
    pub size: u64,
    pub size_inferred: bool,
    pub file_index: u32,
    /// Raw name as written by the linker, still mangled.
    pub name: String,
    pub section: SectionRef,
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceMetadata {
    pub path: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    /// `# Key: value` lines of the map, e.g. `Path` and `Arch`.
    pub headers: IndexMap<String, String>,
}

impl SourceMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Human label for reports: explicit origin, else the map's own `# Path:`.
    pub fn label(&self) -> String {
        self.path
            .clone()
            .or_else(|| self.header("Path").map(str::to_string))
            .unwrap_or_else(|| "<memory>".to_string())
    }
}

/// Rows under a header the parser does not interpret, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpaqueBlock {
    pub header: String,
    pub line: usize,
    pub rows: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    #[serde(skip)]
    id: u64,
    total_size: u64,
    object_files: Vec<ObjectFileEntry>,
    sections: Vec<SectionEntry>,
    symbols: Vec<SymbolEntry>,
    source: SourceMetadata,
    opaque_blocks: Vec<OpaqueBlock>,
    diagnostics: Vec<Diagnostic>,
    #[serde(skip)]
    file_lookup: AHashMap<u32, usize>,
}

impl Snapshot {
    /// Process-unique identity, shared by clones.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn object_files(&self) -> &[ObjectFileEntry] {
        &self.object_files
    }

    pub fn sections(&self) -> &[SectionEntry] {
        &self.sections
    }

    pub fn symbols(&self) -> &[SymbolEntry] {
        &self.symbols
    }

    pub fn source(&self) -> &SourceMetadata {
        &self.source
    }

    pub fn opaque_blocks(&self) -> &[OpaqueBlock] {
        &self.opaque_blocks
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn object_file(&self, index: u32) -> Option<&ObjectFileEntry> {
        self.file_lookup.get(&index).map(|&slot| &self.object_files[slot])
    }

    pub fn section_key(&self, section: SectionRef) -> String {
        match section {
            SectionRef::Known(idx) => self.sections[idx].key(),
            SectionRef::Unclassified => UNCLASSIFIED.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// One symbol row as read from the map, before sizes and sections are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSymbol<'a> {
    /// Address exactly as written, quoted back in errors.
    pub address_token: &'a str,
    pub address: u64,
    pub size: Option<u64>,
    pub file_index: u32,
    pub name: &'a str,
}

struct PendingSymbol {
    address_token: String,
    address: u64,
    size: Option<u64>,
    file_index: u32,
    name: String,
    line: usize,
}

/// Collects raw table rows in any order and resolves them into a [`Snapshot`].
#[derive(Default)]
pub struct SnapshotBuilder {
    object_files: Vec<ObjectFileEntry>,
    file_lookup: AHashMap<u32, usize>,
    sections: Vec<SectionEntry>,
    symbols: Vec<PendingSymbol>,
    source: SourceMetadata,
    opaque_blocks: Vec<OpaqueBlock>,
    tolerance_bytes: u64,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = source;
        self
    }

    pub fn with_tolerance(mut self, tolerance_bytes: u64) -> Self {
        self.tolerance_bytes = tolerance_bytes;
        self
    }

    pub fn source_mut(&mut self) -> &mut SourceMetadata {
        &mut self.source
    }

    pub fn add_object_file(&mut self, index: u32, path: &str, line: usize) -> Result<(), ParseError> {
        if self.file_lookup.contains_key(&index) {
            return Err(ParseError::new(
                ParseErrorKind::DuplicateFileIndex,
                line,
                format!("[{}]", index),
            ));
        }

        self.file_lookup.insert(index, self.object_files.len());
        self.object_files.push(ObjectFileEntry {
            index,
            path: path.to_string(),
            library_key: library_key(path),
            size: 0,
        });
        Ok(())
    }

    pub fn add_section(&mut self, section: SectionEntry) {
        self.sections.push(section);
    }

    pub fn add_symbol(&mut self, address: u64, size: Option<u64>, file_index: u32, name: &str, line: usize) {
        let address_token = format!("0x{:x}", address);
        self.add_raw_symbol(
            RawSymbol {
                address_token: &address_token,
                address,
                size,
                file_index,
                name,
            },
            line,
        );
    }

    pub fn add_raw_symbol(&mut self, row: RawSymbol<'_>, line: usize) {
        self.symbols.push(PendingSymbol {
            address_token: row.address_token.to_string(),
            address: row.address,
            size: row.size,
            file_index: row.file_index,
            name: row.name.to_string(),
            line,
        });
    }

    pub fn add_opaque_block(&mut self, block: OpaqueBlock) {
        self.opaque_blocks.push(block);
    }

    pub fn build(self) -> Result<Snapshot, LinkMapError> {
        let SnapshotBuilder {
            mut object_files,
            file_lookup,
            sections,
            symbols,
            source,
            opaque_blocks,
            tolerance_bytes,
        } = self;

        for sym in &symbols {
            if !file_lookup.contains_key(&sym.file_index) {
                return Err(ReferenceError {
                    file_index: sym.file_index,
                    line: sym.line,
                    symbol: sym.name.clone(),
                }
                .into());
            }
        }

        let refs: Vec<SectionRef> = symbols
            .iter()
            .map(|sym| match sections.iter().position(|s| s.contains(sym.address)) {
                Some(idx) => SectionRef::Known(idx),
                None => SectionRef::Unclassified,
            })
            .collect();

        let mut members: Vec<Vec<usize>> = vec![Vec::new(); sections.len()];
        let mut unclassified = Vec::new();
        for (i, (sym, section)) in symbols.iter().zip(&refs).enumerate() {
            match *section {
                SectionRef::Known(idx) => {
                    if let Some(&prev) = members[idx].last() {
                        if sym.address < symbols[prev].address {
                            return Err(ParseError::new(
                                ParseErrorKind::AddressRegression,
                                sym.line,
                                sym.address_token.as_str(),
                            )
                            .into());
                        }
                    }
                    members[idx].push(i);
                }
                SectionRef::Unclassified => unclassified.push(i),
            }
        }
        unclassified.sort_by_key(|&i| (symbols[i].address, i));

        let mut sizes = vec![0u64; symbols.len()];
        let mut inferred = vec![false; symbols.len()];
        let mut diagnostics = Vec::new();

        let groups = members
            .iter()
            .enumerate()
            .map(|(idx, group)| (Some(sections[idx].end_address()), group))
            .chain(std::iter::once((None, &unclassified)));

        for (section_end, group) in groups {
            for (pos, &i) in group.iter().enumerate() {
                let sym = &symbols[i];
                if let Some(size) = sym.size {
                    sizes[i] = size;
                    continue;
                }

                inferred[i] = true;
                let next = group.get(pos + 1).map(|&j| symbols[j].address);
                match next.or(section_end) {
                    Some(bound) => {
                        sizes[i] = bound.saturating_sub(sym.address);
                        if next == Some(sym.address) {
                            diagnostics.push(Diagnostic::SharedAddress {
                                line: sym.line,
                                address: sym.address,
                                symbol: sym.name.clone(),
                            });
                        }
                    }
                    None => diagnostics.push(Diagnostic::UnboundedSize {
                        line: sym.line,
                        address: sym.address,
                        symbol: sym.name.clone(),
                    }),
                }
            }
        }

        // Every partial sum is bounded by the running total, so only the
        // total needs a checked add.
        let mut total_size = 0u64;
        let mut observed = vec![0u64; sections.len()];
        for (i, sym) in symbols.iter().enumerate() {
            total_size = total_size.checked_add(sizes[i]).ok_or_else(|| {
                ParseError::new(ParseErrorKind::SizeOverflow, sym.line, format!("0x{:x}", sizes[i]))
            })?;
            object_files[file_lookup[&sym.file_index]].size += sizes[i];
            if let SectionRef::Known(idx) = refs[i] {
                observed[idx] += sizes[i];
            }
        }

        diagnostics.sort_by_key(|d| d.line().unwrap_or(usize::MAX));
        for (section, &sum) in sections.iter().zip(&observed) {
            if sum > section.size.saturating_add(tolerance_bytes) {
                diagnostics.push(Diagnostic::ToleranceViolation {
                    section: section.key(),
                    declared: section.size,
                    observed: sum,
                    tolerance: tolerance_bytes,
                });
            }
        }

        for diagnostic in &diagnostics {
            log::warn!("{}", diagnostic);
        }

        let symbols = symbols
            .into_iter()
            .enumerate()
            .map(|(i, sym)| SymbolEntry {
                address: sym.address,
                size: sizes[i],
                size_inferred: inferred[i],
                file_index: sym.file_index,
                name: sym.name,
                section: refs[i],
                line: sym.line,
            })
            .collect();

        Ok(Snapshot {
            id: NEXT_SNAPSHOT_ID.fetch_add(1, Ordering::Relaxed),
            total_size,
            object_files,
            sections,
            symbols,
            source,
            opaque_blocks,
            diagnostics,
            file_lookup,
        })
    }
}
