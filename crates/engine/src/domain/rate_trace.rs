#![forbid(unsafe_code)]

use crate::domain::{Byterate, Tick};
use std::collections::BTreeMap;

/// Sparse step function from tick to byterate. A value holds until the next
/// entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateTrace {
    points: BTreeMap<Tick, Byterate>,
}

impl RateTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value at `tick`, returning the one it replaces.
    pub fn insert(&mut self, tick: Tick, rate: Byterate) -> Option<Byterate> {
        self.points.insert(tick, rate)
    }

    /// Entry recorded exactly at `tick`.
    pub fn at(&self, tick: Tick) -> Option<Byterate> {
        self.points.get(&tick).copied()
    }

    /// Value in effect at `tick`: the nearest entry at or before it.
    pub fn value_at(&self, tick: Tick) -> Option<Byterate> {
        self.points
            .range(..=tick)
            .next_back()
            .map(|(_, rate)| *rate)
    }

    /// Entries in ascending tick order.
    pub fn iter(&self) -> impl Iterator<Item = (Tick, Byterate)> + '_ {
        self.points.iter().map(|(tick, rate)| (*tick, *rate))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<(Tick, Byterate)> for RateTrace {
    fn from_iter<I: IntoIterator<Item = (Tick, Byterate)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
