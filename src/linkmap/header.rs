// Mon Feb 16 2026 - Alex

use crate::linkmap::error::{ParseError, ParseErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    ObjectFiles,
    Sections,
    Symbols,
}

impl TableKind {
    fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "object files" => Some(TableKind::ObjectFiles),
            "sections" => Some(TableKind::Sections),
            "symbols" => Some(TableKind::Symbols),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker<'a> {
    Table(TableKind),
    /// `# Key: value` carrying a value, e.g. `# Arch: arm64`.
    Metadata { key: &'a str, value: &'a str },
    /// A table header we don't interpret, e.g. `# Dead Stripped Symbols:`.
    Opaque(&'a str),
    /// Column titles such as `# Address  Size  File  Name`.
    ColumnTitles,
}

/// Classifies a comment line by its marker text. Returns `None` for data rows.
pub fn classify(line: &str, line_no: usize) -> Result<Option<Marker<'_>>, ParseError> {
    let trimmed = line.trim();
    let body = match trimmed.strip_prefix('#') {
        Some(body) => body.trim(),
        None => return Ok(None),
    };

    let (key, value) = match body.split_once(':') {
        Some((key, value)) => (key.trim(), value.trim()),
        None => return Ok(Some(Marker::ColumnTitles)),
    };

    if key.is_empty() {
        return Err(ParseError::new(ParseErrorKind::MalformedHeader, line_no, trimmed));
    }

    if let Some(kind) = TableKind::from_key(key) {
        return Ok(Some(Marker::Table(kind)));
    }

    if value.is_empty() {
        Ok(Some(Marker::Opaque(key)))
    } else {
        Ok(Some(Marker::Metadata { key, value }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognizes_tables_by_text() {
        assert_eq!(classify("# Object files:", 1).unwrap(), Some(Marker::Table(TableKind::ObjectFiles)));
        assert_eq!(classify("#   SECTIONS:", 1).unwrap(), Some(Marker::Table(TableKind::Sections)));
        assert_eq!(classify("# Symbols:", 1).unwrap(), Some(Marker::Table(TableKind::Symbols)));
    }

    #[test]
    fn test_metadata_and_opaque_headers() {
        assert_eq!(
            classify("# Path: /tmp/Build/App", 1).unwrap(),
            Some(Marker::Metadata { key: "Path", value: "/tmp/Build/App" })
        );
        assert_eq!(
            classify("# Dead Stripped Symbols:", 1).unwrap(),
            Some(Marker::Opaque("Dead Stripped Symbols"))
        );
        assert_eq!(
            classify("# Address\tSize    \tFile  Name", 1).unwrap(),
            Some(Marker::ColumnTitles)
        );
    }

    #[test]
    fn test_data_rows_are_not_markers() {
        assert_eq!(classify("0x1000\t0x10\t[  1] _main", 1).unwrap(), None);
    }

    #[test]
    fn test_empty_key_is_malformed() {
        let err = classify("# : nothing", 4).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::MalformedHeader);
        assert_eq!(err.line, 4);
    }
}
