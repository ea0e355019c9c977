#![forbid(unsafe_code)]

use crate::domain::{RequestId, Tick};
use rustc_hash::FxHashMap;
use tracing::warn;

/// A completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheRecord {
    pub completion_tick: Tick,
    /// Tick the fetch was issued at.
    pub issue_tick: Tick,
}

/// Remembers which requests have been fetched. Content is irrelevant to the
/// simulation, so only timestamps are kept.
#[derive(Debug, Default)]
pub struct CacheProcessor {
    records: FxHashMap<RequestId, CacheRecord>,
}

impl CacheProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed fetch. A request is cached at most once; later
    /// saves are ignored and `false` is returned.
    pub fn save(&mut self, id: RequestId, completion_tick: Tick, issue_tick: Tick) -> bool {
        if let Some(existing) = self.records.get(&id) {
            warn!(?id, ?existing, completion_tick, "request cached twice");
            return false;
        }
        self.records.insert(
            id,
            CacheRecord {
                completion_tick,
                issue_tick,
            },
        );
        true
    }

    pub fn get(&self, id: RequestId) -> Option<&CacheRecord> {
        self.records.get(&id)
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Request;
    use crate::stores::RequestStore;

    #[test]
    fn first_save_wins() {
        let mut store = RequestStore::default();
        let id = store.insert(Request::new(10, 1, 1));
        let mut cache = CacheProcessor::new();

        assert!(!cache.contains(id));
        assert!(cache.save(id, 7, 3));
        assert!(!cache.save(id, 9, 8));
        assert_eq!(
            cache.get(id),
            Some(&CacheRecord {
                completion_tick: 7,
                issue_tick: 3
            })
        );
        assert_eq!(cache.len(), 1);
    }
}
