// Mon Feb 16 2026 - Alex

use crate::config::ParserConfig;
use crate::linkmap::error::{LinkMapError, ParseError, ParseErrorKind};
use crate::linkmap::header::{self, Marker, TableKind};
use crate::linkmap::snapshot::{OpaqueBlock, RawSymbol, SectionEntry, Snapshot, SnapshotBuilder, SourceMetadata};
use ahash::AHashSet;
use once_cell::sync::Lazy;
use regex::Regex;

static BRACKETED_FILE_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[\s*(\d+)\s*\]\s*(.*)$").unwrap());

static PLAIN_FILE_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\s+(.+)$").unwrap());

static SYMBOL_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\S+)\s+(?:(\S+)\s+)?\[\s*(\d+)\s*\]\s?(.*)$").unwrap());

#[derive(Debug, Clone, Copy)]
enum Cursor {
    Outside,
    Table(TableKind),
    Opaque(usize),
}

/// Turns link map text into a [`Snapshot`]. Performs no I/O.
#[derive(Debug, Clone, Default)]
pub struct LinkMapParser {
    config: ParserConfig,
    source: SourceMetadata,
}

impl LinkMapParser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            source: SourceMetadata::default(),
        }
    }

    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = source;
        self
    }

    pub fn parse(&self, text: &str) -> Result<Snapshot, LinkMapError> {
        let mut builder = SnapshotBuilder::new()
            .with_source(self.source.clone())
            .with_tolerance(self.config.tolerance_bytes);
        let mut opaque: Vec<OpaqueBlock> = Vec::new();
        let mut seen = AHashSet::new();
        let mut cursor = Cursor::Outside;
        let mut rows = [0usize; 3];

        for (idx, raw) in split_lines(text).enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            match header::classify(line, line_no)? {
                Some(Marker::Table(kind)) => {
                    if !seen.insert(kind) {
                        return Err(ParseError::new(ParseErrorKind::UnexpectedTableOrder, line_no, line).into());
                    }
                    log::debug!("line {}: {:?} table", line_no, kind);
                    cursor = Cursor::Table(kind);
                }
                Some(Marker::Metadata { key, value }) => {
                    builder
                        .source_mut()
                        .headers
                        .insert(key.to_string(), value.to_string());
                }
                Some(Marker::Opaque(key)) => {
                    log::debug!("line {}: keeping unrecognized block `{}` as metadata", line_no, key);
                    opaque.push(OpaqueBlock {
                        header: key.to_string(),
                        line: line_no,
                        rows: Vec::new(),
                    });
                    cursor = Cursor::Opaque(opaque.len() - 1);
                }
                Some(Marker::ColumnTitles) => {}
                None => match cursor {
                    Cursor::Outside => {
                        return Err(ParseError::new(ParseErrorKind::MalformedHeader, line_no, line).into());
                    }
                    Cursor::Opaque(block) => opaque[block].rows.push(line.to_string()),
                    Cursor::Table(TableKind::ObjectFiles) => {
                        let (index, path) = parse_object_file_row(line, line_no)?;
                        builder.add_object_file(index, path, line_no)?;
                        rows[0] += 1;
                    }
                    Cursor::Table(TableKind::Sections) => {
                        builder.add_section(parse_section_row(line, line_no)?);
                        rows[1] += 1;
                    }
                    Cursor::Table(TableKind::Symbols) => {
                        builder.add_raw_symbol(parse_symbol_row(line, line_no)?, line_no);
                        rows[2] += 1;
                    }
                },
            }
        }

        log::debug!(
            "read {} object files, {} sections, {} symbols, {} opaque blocks",
            rows[0],
            rows[1],
            rows[2],
            opaque.len()
        );

        for block in opaque {
            builder.add_opaque_block(block);
        }

        builder.build()
    }
}

/// Parses with default settings and no source metadata.
pub fn parse(text: &str) -> Result<Snapshot, LinkMapError> {
    LinkMapParser::default().parse(text)
}

/// `\r\n` counts as one break; any other `\r` or `\n` is a break of its own.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split("\r\n")
        .flat_map(|chunk| chunk.split(|c| c == '\r' || c == '\n'))
}

/// `0x` hex or plain decimal.
pub(crate) fn parse_number(token: &str) -> Option<u64> {
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}

fn number_field(token: &str, line_no: usize) -> Result<u64, ParseError> {
    parse_number(token).ok_or_else(|| ParseError::new(ParseErrorKind::SizeFieldNotInteger, line_no, token))
}

fn parse_object_file_row(line: &str, line_no: usize) -> Result<(u32, &str), ParseError> {
    let caps = BRACKETED_FILE_ROW
        .captures(line)
        .or_else(|| PLAIN_FILE_ROW.captures(line))
        .ok_or_else(|| ParseError::new(ParseErrorKind::MalformedRow, line_no, line))?;

    let index_token = caps.get(1).map_or("", |m| m.as_str());
    let index = index_token
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::SizeFieldNotInteger, line_no, index_token))?;

    let path = caps.get(2).map_or("", |m| m.as_str()).trim();
    if path.is_empty() {
        return Err(ParseError::new(ParseErrorKind::MalformedRow, line_no, line));
    }

    Ok((index, path))
}

fn parse_section_row(line: &str, line_no: usize) -> Result<SectionEntry, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let malformed = || ParseError::new(ParseErrorKind::MalformedRow, line_no, line);

    let starts_with_number = tokens
        .first()
        .map_or(false, |t| t.starts_with("0x") || t.starts_with("0X") || t.bytes().all(|b| b.is_ascii_digit()));

    if starts_with_number {
        // ld64 layout: Address Size Segment Section
        if tokens.len() < 4 {
            return Err(malformed());
        }
        let start = number_field(tokens[0], line_no)?;
        let size = number_field(tokens[1], line_no)?;
        return Ok(SectionEntry::new(tokens[2], tokens[3], start, size));
    }

    match tokens.as_slice() {
        [qualified, start, size, ..] if qualified.contains(',') => {
            let (segment, name) = qualified.split_once(',').ok_or_else(malformed)?;
            if segment.is_empty() || name.is_empty() {
                return Err(malformed());
            }
            Ok(SectionEntry::new(
                segment,
                name,
                number_field(start, line_no)?,
                number_field(size, line_no)?,
            ))
        }
        [segment, name, start, size, ..] => Ok(SectionEntry::new(
            segment,
            name,
            number_field(start, line_no)?,
            number_field(size, line_no)?,
        )),
        _ => Err(malformed()),
    }
}

fn parse_symbol_row(line: &str, line_no: usize) -> Result<RawSymbol<'_>, ParseError> {
    let caps = SYMBOL_ROW
        .captures(line)
        .ok_or_else(|| ParseError::new(ParseErrorKind::MalformedRow, line_no, line))?;

    let address_token = caps.get(1).map_or("", |m| m.as_str());
    let address = number_field(address_token, line_no)?;
    let size = match caps.get(2) {
        Some(m) => Some(number_field(m.as_str(), line_no)?),
        None => None,
    };
    let index_token = caps.get(3).map_or("", |m| m.as_str());
    let file_index = index_token
        .parse::<u32>()
        .map_err(|_| ParseError::new(ParseErrorKind::SizeFieldNotInteger, line_no, index_token))?;
    let name = caps.get(4).map_or("", |m| m.as_str()).trim();

    Ok(RawSymbol {
        address_token,
        address,
        size,
        file_index,
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linkmap::snapshot::SectionRef;

    const SIZE_INFERENCE_MAP: &str = "\
# Object files:
[0] libFoo.a(Bar.o)
[1] main.o
# Sections:
__TEXT,__text 0x1000 0x300
# Symbols:
0x1000 0x100 [0] _barFunc
0x1100 [1] _main
";

    const LD64_MAP: &str = "\
# Path: /Users/ci/Build/Products/Release-iphoneos/App.app/App
# Arch: arm64
# Object files:
[  0] linker synthesized
[  1] /Users/ci/DerivedData/App-fjdk/Build/Intermediates.noindex/App.build/Objects-normal/arm64/AppDelegate.o
[  2] /Users/ci/Pods/libPods.a(Networking.o)
[  3] /Users/ci/Frameworks/Lottie.framework/Lottie
# Sections:
# Address\tSize    \tSegment\tSection
0x100004000\t0x00000200\t__TEXT\t__text
0x100004200\t0x00000040\t__TEXT\t__cstring
0x100008000\t0x00000020\t__DATA\t__data
# Symbols:
# Address\tSize    \tFile  Name
0x100004000\t0x00000080\t[  1] _$s3App0A8DelegateC
0x100004080\t0x00000100\t[  2] -[Networking start]
0x100004180\t0x00000080\t[  3] _lottie_render
0x100004200\t0x00000040\t[  2] literal string: https://example.com
0x100008000\t0x00000008\t[  0] ___dso_handle
0x100008008\t0x00000018\t[  1] _gAppState


# Dead Stripped Symbols:
#        \tSize    \tFile  Name
<<dead>> \t0x00000018\t[  2] _unusedHelper
";

    #[test]
    fn test_infers_omitted_size() {
        let snapshot = parse(SIZE_INFERENCE_MAP).unwrap();
        let main = &snapshot.symbols()[1];
        assert_eq!(main.name, "_main");
        assert_eq!(main.size, 0x200);
        assert!(main.size_inferred);
        assert!(!snapshot.symbols()[0].size_inferred);
        assert_eq!(snapshot.total_size(), 0x300);
    }

    #[test]
    fn test_parses_ld64_layout() {
        let snapshot = parse(LD64_MAP).unwrap();

        assert_eq!(snapshot.object_files().len(), 4);
        assert_eq!(snapshot.sections().len(), 3);
        assert_eq!(snapshot.symbols().len(), 6);
        assert_eq!(snapshot.total_size(), 0x80 + 0x100 + 0x80 + 0x40 + 0x8 + 0x18);
        assert_eq!(snapshot.source().header("arch"), Some("arm64"));
        assert_eq!(snapshot.object_file(2).unwrap().library_key, "libPods");
        assert_eq!(snapshot.object_file(3).unwrap().library_key, "Lottie");

        let literal = &snapshot.symbols()[3];
        assert_eq!(literal.name, "literal string: https://example.com");
        assert_eq!(literal.section, SectionRef::Known(1));

        assert_eq!(snapshot.opaque_blocks().len(), 1);
        assert_eq!(snapshot.opaque_blocks()[0].header, "Dead Stripped Symbols");
        assert_eq!(snapshot.opaque_blocks()[0].rows.len(), 1);
        assert!(snapshot.diagnostics().is_empty());
    }

    #[test]
    fn test_tables_in_any_order() {
        let text = "\
# Symbols:
0x1000 0x10 [1] _a
# Sections:
0x1000 0x100 __TEXT __text
# Object files:
[1] a.o
";
        let snapshot = parse(text).unwrap();
        assert_eq!(snapshot.total_size(), 0x10);
        assert_eq!(snapshot.symbols()[0].section, SectionRef::Known(0));
    }

    #[test]
    fn test_address_regression_reports_offending_line() {
        let text = "\
# Object files:
[0] main.o
# Sections:
__TEXT,__text 0x1000 0x2000
# Symbols:
0x2000 0x10 [0] _second
0x1000 0x10 [0] _first
";
        let err = parse(text).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::AddressRegression);
        assert_eq!(err.line(), 7);
        assert_eq!(err.token(), "0x1000");
    }

    #[test]
    fn test_dangling_reference_is_fatal() {
        let text = "# Object files:\n[0] main.o\n# Symbols:\n0x1000 0x10 [9] _lost\n";
        let err = parse(text).unwrap_err();
        assert!(matches!(err, LinkMapError::Reference(_)));
        assert_eq!(err.kind(), ParseErrorKind::DanglingReference);
        assert_eq!(err.line(), 4);
    }

    #[test]
    fn test_size_field_not_integer() {
        let text = "# Object files:\n[0] main.o\n# Symbols:\n0x1000 0xZZ [0] _bad\n";
        let err = parse(text).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::SizeFieldNotInteger);
        assert_eq!(err.token(), "0xZZ");
    }

    #[test]
    fn test_duplicate_table_header() {
        let text = "# Object files:\n[0] a.o\n# Object files:\n[1] b.o\n";
        let err = parse(text).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnexpectedTableOrder);
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_row_before_any_header() {
        let err = parse("0x1000 0x10 [0] _a\n").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::MalformedHeader);
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_duplicate_file_index() {
        let err = parse("# Object files:\n[ 1] a.o\n[ 1] b.o\n").unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::DuplicateFileIndex);
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_unbracketed_one_based_indices_and_crlf() {
        let text = "# Object files:\r\n1 a.o\r\n2 b.o\r\n# Symbols:\r\n0x10 0x4 [2] _b\r\n";
        let snapshot = parse(text).unwrap();
        assert_eq!(snapshot.object_file(2).unwrap().size, 4);
        assert_eq!(snapshot.object_file(1).unwrap().size, 0);
    }

    #[test]
    fn test_lone_cr_line_endings() {
        let text = "# Object files:\r[0] a.o\r[1] b.o\r# Symbols:\r0x10 0x4 [1] _b\r0x14 0x8 [0] _a\r";
        let snapshot = parse(text).unwrap();
        assert_eq!(snapshot.object_file(0).unwrap().path, "a.o");
        assert_eq!(snapshot.object_file(1).unwrap().size, 4);
        assert_eq!(snapshot.symbols()[1].line, 6);
    }

    #[test]
    fn test_mixed_line_endings() {
        let text = "# Object files:\n[0] a.o\r[1] b.o\r\n# Symbols:\n0x10 0x4 [1] _b\n";
        let snapshot = parse(text).unwrap();
        assert_eq!(snapshot.object_file(0).unwrap().path, "a.o");
        assert_eq!(snapshot.object_file(1).unwrap().path, "b.o");
        assert_eq!(snapshot.object_file(1).unwrap().size, 4);
        assert_eq!(snapshot.symbols()[0].line, 5);
    }

    #[test]
    fn test_segment_first_section_without_comma() {
        let text = "\
# Object files:
[0] main.o
# Sections:
__DATA __data 0x2000 0x40
# Symbols:
0x2000 0x10 [0] _global
";
        let snapshot = parse(text).unwrap();
        assert_eq!(snapshot.sections(), &[SectionEntry::new("__DATA", "__data", 0x2000, 0x40)]);
        assert_eq!(snapshot.symbols()[0].section, SectionRef::Known(0));
    }

    #[test]
    fn test_address_regression_quotes_address_as_written() {
        let text = "\
# Object files:
[0] main.o
# Sections:
0x1000 0x2000 __TEXT __text
# Symbols:
0x00002000 0x10 [0] _second
0x00001000 0x10 [0] _first
";
        let err = parse(text).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::AddressRegression);
        assert_eq!(err.token(), "0x00001000");
    }

    #[test]
    fn test_oversized_symbols_fail_instead_of_overflowing() {
        let text = "# Object files:\n[0] main.o\n# Symbols:\n0x1000 0xffffffffffffffff [0] _a\n0x2000 0x10 [0] _b\n";
        let err = parse(text).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::SizeOverflow);
        assert_eq!(err.line(), 5);
    }

    #[test]
    fn test_empty_input_is_empty_snapshot() {
        let snapshot = parse("").unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total_size(), 0);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("0x1F"), Some(31));
        assert_eq!(parse_number("42"), Some(42));
        assert_eq!(parse_number("0x"), None);
        assert_eq!(parse_number("12a"), None);
    }

    #[test]
    fn test_source_metadata_is_carried() {
        let parser = LinkMapParser::new(ParserConfig::default())
            .with_source(SourceMetadata::new().with_path("build/App-LinkMap.txt"));
        let snapshot = parser.parse(SIZE_INFERENCE_MAP).unwrap();
        assert_eq!(snapshot.source().path.as_deref(), Some("build/App-LinkMap.txt"));
    }
}
