// Tue Feb 17 2026 - Alex

use crate::linkmap::Snapshot;
use crate::rollup::aggregator::percent;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolRow {
    pub name: String,
    pub address: u64,
    pub size: u64,
    pub library: String,
    pub section: String,
    pub percent_of_total: f64,
}

/// The `n` largest symbols, ties broken by name then address.
pub fn top_symbols(snapshot: &Snapshot, n: usize) -> Vec<SymbolRow> {
    let mut symbols: Vec<_> = snapshot.symbols().iter().collect();
    symbols.sort_by(|a, b| (Reverse(a.size), &a.name, a.address).cmp(&(Reverse(b.size), &b.name, b.address)));

    symbols
        .into_iter()
        .take(n)
        .map(|sym| SymbolRow {
            name: sym.name.clone(),
            address: sym.address,
            size: sym.size,
            library: snapshot
                .object_file(sym.file_index)
                .map(|f| f.library_key.clone())
                .unwrap_or_default(),
            section: snapshot.section_key(sym.section),
            percent_of_total: percent(sym.size, snapshot.total_size()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linkmap::parse;

    #[test]
    fn test_largest_symbols_first() {
        let snapshot = parse(
            "# Object files:\n[0] libFoo.a(Bar.o)\n[1] main.o\n# Sections:\n__TEXT,__text 0x1000 0x300\n\
             # Symbols:\n0x1000 0x100 [0] _barFunc\n0x1100 [1] _main\n",
        )
        .unwrap();

        let rows = top_symbols(&snapshot, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "_main");
        assert_eq!(rows[0].library, "<main target>");
        assert_eq!(rows[0].section, "__TEXT,__text");
        assert!((rows[0].percent_of_total - 2.0 / 3.0).abs() < 1e-9);
    }
}
