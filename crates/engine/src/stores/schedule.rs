#![forbid(unsafe_code)]

use crate::domain::{RequestId, Tick};
use std::collections::BTreeMap;

/// Earliest fetch start per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    entries: BTreeMap<RequestId, Tick>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: RequestId, start: Tick) -> Option<Tick> {
        self.entries.insert(id, start)
    }

    pub fn get(&self, id: RequestId) -> Option<Tick> {
        self.entries.get(&id).copied()
    }

    pub fn remove(&mut self, id: RequestId) -> Option<Tick> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (RequestId, Tick)> + '_ {
        self.entries.iter().map(|(id, start)| (*id, *start))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take over every entry of `update`. Entries `update` does not mention
    /// are left untouched.
    pub fn merge(&mut self, update: &Schedule) {
        self.entries.extend(update.iter());
    }

    pub fn retain(&mut self, mut keep: impl FnMut(RequestId) -> bool) {
        self.entries.retain(|id, _| keep(*id));
    }

    /// The entry due at `tick` with the smallest start; equal starts go to
    /// the smallest id.
    pub fn earliest_due(&self, tick: Tick) -> Option<(RequestId, Tick)> {
        self.iter()
            .filter(|(_, start)| *start <= tick)
            .min_by_key(|(id, start)| (*start, *id))
    }
}

impl FromIterator<(RequestId, Tick)> for Schedule {
    fn from_iter<I: IntoIterator<Item = (RequestId, Tick)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
