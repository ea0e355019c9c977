#![forbid(unsafe_code)]

mod generator;
mod reader;
mod writer;

pub use generator::ScenarioGenerator;
pub use reader::read_scenario;
pub use writer::write_scenario;

use crate::domain::{RateTrace, Request, Tick};
use crate::error::Error;
use config::AlgorithmKind;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Fully materialized input of one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub total_ticks: Tick,
    pub look_ahead: Tick,
    /// Byterate the link actually delivers.
    pub rate_real: RateTrace,
    /// Byterate the scheduler is told to expect.
    pub rate_predicted: RateTrace,
    /// Requests in deadline order.
    pub requests: Vec<Request>,
    pub algorithm: AlgorithmKind,
    pub algorithm_parameters: BTreeMap<String, String>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            total_ticks: 1,
            look_ahead: 1,
            rate_real: RateTrace::default(),
            rate_predicted: RateTrace::default(),
            requests: Vec::new(),
            algorithm: AlgorithmKind::default(),
            algorithm_parameters: BTreeMap::new(),
        }
    }
}

impl Scenario {
    /// The scenario in its text form. Fails for scenarios the text form
    /// cannot represent, see [`write_scenario`].
    pub fn to_text(&self) -> Result<String, Error> {
        let mut buf = Vec::new();
        write_scenario(self, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        read_scenario(s.as_bytes())
    }
}
