// Tue Feb 17 2026 - Alex

use crate::linkmap::Snapshot;
use crate::rollup::aggregator::{aggregate, RollupModel};
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Rollups memoized by snapshot identity and cut-off.
///
/// Snapshots never change after they are built, so an entry stays valid for as
/// long as its snapshot is alive. Call [`RollupCache::evict`] when dropping one.
pub struct RollupCache {
    entries: RwLock<AHashMap<(u64, Option<usize>), Arc<RollupModel>>>,
}

impl RollupCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(AHashMap::new()),
        }
    }

    pub fn get_or_compute(&self, snapshot: &Snapshot, top_n: Option<usize>) -> Arc<RollupModel> {
        let key = (snapshot.id(), top_n);
        if let Some(model) = self.entries.read().get(&key) {
            return Arc::clone(model);
        }

        let model = Arc::new(aggregate(snapshot, top_n));
        self.entries
            .write()
            .entry(key)
            .or_insert_with(|| Arc::clone(&model))
            .clone()
    }

    pub fn evict(&self, snapshot_id: u64) {
        self.entries.write().retain(|(id, _), _| *id != snapshot_id);
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for RollupCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linkmap::parse;

    const MAP: &str = "# Object files:\n[0] main.o\n# Symbols:\n0x10 0x4 [0] _a\n0x14 0x8 [0] _b\n";

    #[test]
    fn test_returns_cached_model() {
        let cache = RollupCache::new();
        let snapshot = parse(MAP).unwrap();

        let first = cache.get_or_compute(&snapshot, None);
        let second = cache.get_or_compute(&snapshot, None);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        cache.get_or_compute(&snapshot, Some(1));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_distinct_snapshots_do_not_collide() {
        let cache = RollupCache::new();
        let a = parse(MAP).unwrap();
        let b = parse(MAP).unwrap();

        let ma = cache.get_or_compute(&a, None);
        let mb = cache.get_or_compute(&b, None);
        assert!(!Arc::ptr_eq(&ma, &mb));
        assert_eq!(*ma, *mb);

        cache.evict(a.id());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
