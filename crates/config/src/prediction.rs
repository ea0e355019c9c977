use crate::Distribution;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

/// Error model of the byterate prediction. With every distribution at 0 the
/// prediction equals the un-jittered real trace.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Prediction {
    /// Time shift as a fraction of the mean slot length.
    #[serde_as(as = "DisplayFromStr")]
    pub relative_time_error: Distribution<f64>,

    /// Time shift in ticks.
    #[serde_as(as = "DisplayFromStr")]
    pub absolute_time_error: Distribution<i64>,

    /// Amplitude error as a fraction of the real byterate.
    #[serde_as(as = "DisplayFromStr")]
    pub relative_amplitude_error: Distribution<f64>,

    /// Amplitude error in bytes per tick.
    #[serde_as(as = "DisplayFromStr")]
    pub absolute_amplitude_error: Distribution<i64>,
}
