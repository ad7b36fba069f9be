// Mon Feb 16 2026 - Alex

use crate::linkmap::{SectionRef, Snapshot};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

pub const OTHERS_KEY: &str = "<others>";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupRow {
    pub key: String,
    pub size: u64,
    /// Number of symbols folded into this row.
    pub count: usize,
    /// Fraction of the snapshot total in `0.0..=1.0`.
    pub percent_of_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupModel {
    pub total_size: u64,
    pub by_library: Vec<RollupRow>,
    pub by_file: Vec<RollupRow>,
    pub by_section: Vec<RollupRow>,
}

impl RollupModel {
    pub fn library(&self, key: &str) -> Option<&RollupRow> {
        self.by_library.iter().find(|r| r.key == key)
    }

    pub fn file(&self, key: &str) -> Option<&RollupRow> {
        self.by_file.iter().find(|r| r.key == key)
    }

    pub fn section(&self, key: &str) -> Option<&RollupRow> {
        self.by_section.iter().find(|r| r.key == key)
    }
}

/// Sums a snapshot's symbols per library, per object file and per section.
///
/// Rows are ordered by size descending, then key ascending, so the result does
/// not depend on table order in the source. With `top_n`, rows past the cut are
/// folded into one trailing `<others>` row and every view still sums to
/// `total_size`.
pub fn aggregate(snapshot: &Snapshot, top_n: Option<usize>) -> RollupModel {
    let total = snapshot.total_size();

    let mut by_slot: Vec<(u64, usize)> = vec![(0, 0); snapshot.object_files().len()];
    let mut by_section: AHashMap<SectionRef, (u64, usize)> = AHashMap::new();
    let slots: AHashMap<u32, usize> = snapshot
        .object_files()
        .iter()
        .enumerate()
        .map(|(slot, file)| (file.index, slot))
        .collect();

    for symbol in snapshot.symbols() {
        if let Some(&slot) = slots.get(&symbol.file_index) {
            by_slot[slot].0 += symbol.size;
            by_slot[slot].1 += 1;
        }
        let entry = by_section.entry(symbol.section).or_insert((0, 0));
        entry.0 += symbol.size;
        entry.1 += 1;
    }

    let mut libraries: AHashMap<&str, (u64, usize)> = AHashMap::new();
    let mut files: AHashMap<&str, (u64, usize)> = AHashMap::new();
    for (file, &(size, count)) in snapshot.object_files().iter().zip(&by_slot) {
        if count == 0 {
            continue;
        }
        let lib = libraries.entry(file.library_key.as_str()).or_insert((0, 0));
        lib.0 += size;
        lib.1 += count;
        let f = files.entry(file.path.as_str()).or_insert((0, 0));
        f.0 += size;
        f.1 += count;
    }

    let sections = by_section
        .into_iter()
        .map(|(section, totals)| (snapshot.section_key(section), totals));

    RollupModel {
        total_size: total,
        by_library: rank(libraries.into_iter().map(|(k, v)| (k.to_string(), v)), total, top_n),
        by_file: rank(files.into_iter().map(|(k, v)| (k.to_string(), v)), total, top_n),
        by_section: rank(sections, total, top_n),
    }
}

pub(crate) fn percent(size: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        size as f64 / total as f64
    }
}

fn rank(
    rows: impl Iterator<Item = (String, (u64, usize))>,
    total: u64,
    top_n: Option<usize>,
) -> Vec<RollupRow> {
    let mut rows: Vec<RollupRow> = rows
        .map(|(key, (size, count))| RollupRow {
            key,
            size,
            count,
            percent_of_total: percent(size, total),
        })
        .collect();

    rows.sort_by(|a, b| (Reverse(a.size), &a.key).cmp(&(Reverse(b.size), &b.key)));

    if let Some(n) = top_n {
        if rows.len() > n {
            let rest = rows.split_off(n);
            let size = rest.iter().map(|r| r.size).sum();
            rows.push(RollupRow {
                key: OTHERS_KEY.to_string(),
                size,
                count: rest.iter().map(|r| r.count).sum(),
                percent_of_total: percent(size, total),
            });
        }
    }

    rows
}
