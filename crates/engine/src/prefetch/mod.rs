#![forbid(unsafe_code)]

mod algorithm;
mod baseline;
mod ignore_rate;
mod respect_rate;

pub use algorithm::{Algorithm, CONNECTION_OVERHEAD, PrefetchAlgorithm};
pub use baseline::{NullAlgorithm, StartAtDeadline};
pub use ignore_rate::IgnoreRatePrediction;
pub use respect_rate::RespectRatePrediction;
