#![forbid(unsafe_code)]

mod oracle;

pub use oracle::{RatePredictionService, TracePrediction};
