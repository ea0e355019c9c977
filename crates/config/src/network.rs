use crate::Distribution;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Network {
    /// Byterate of the link during one slot, in bytes per tick. Consecutive
    /// slots are smoothed, so the real trace moves slower than this
    /// distribution alone suggests.
    #[serde_as(as = "DisplayFromStr")]
    pub byterate: Distribution<i64>,

    /// Length of one slot in ticks. Draws below 1 are treated as 1.
    ///
    /// The mean of this distribution also scales the relative prediction
    /// time error and sets the re-graining step (`mean / 10`).
    #[serde_as(as = "DisplayFromStr")]
    pub slot_length: Distribution<i64>,

    /// Probability that the link is up during a slot. A slot where the link
    /// is down has a byterate of 0.
    pub uptime: f64,

    /// Relative jitter applied to the real trace on the re-graining grid.
    #[serde_as(as = "DisplayFromStr")]
    pub relative_jitter: Distribution<f64>,

    /// Absolute jitter in bytes per tick, applied after the relative one.
    #[serde_as(as = "DisplayFromStr")]
    pub absolute_jitter: Distribution<i64>,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            byterate: Distribution::Exact(100),
            slot_length: Distribution::Exact(100),
            uptime: 1.0,
            relative_jitter: Distribution::Exact(0.0),
            absolute_jitter: Distribution::Exact(0),
        }
    }
}
