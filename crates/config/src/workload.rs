use crate::Distribution;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

/// A recurring series of requests between a start and an end tick.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RequestSeries {
    /// Ticks between two consecutive deadlines. Draws below 1 are treated as 1.
    #[serde_as(as = "DisplayFromStr")]
    pub interval: Distribution<i64>,

    /// Request size in bytes.
    #[serde_as(as = "DisplayFromStr")]
    pub size: Distribution<i64>,

    /// Byterate the server grants to a single request.
    #[serde_as(as = "DisplayFromStr")]
    pub byterate: Distribution<i64>,

    /// Deadline of the first request; clamped into the simulated range.
    #[serde_as(as = "DisplayFromStr")]
    pub start: Distribution<i64>,

    /// Last possible deadline; clamped to be at least `start`.
    #[serde_as(as = "DisplayFromStr")]
    pub end: Distribution<i64>,
}

impl Default for RequestSeries {
    fn default() -> Self {
        Self {
            interval: Distribution::Exact(100),
            size: Distribution::Exact(100),
            byterate: Distribution::Exact(10),
            start: Distribution::Exact(0),
            end: Distribution::Exact(i64::MAX),
        }
    }
}

/// A single request with fixed parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixedRequest {
    pub deadline: i64,
    pub data: u32,
    pub byterate: u32,
}
