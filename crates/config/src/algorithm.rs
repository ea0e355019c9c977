use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The prefetch scheduling strategy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlgorithmKind {
    /// Never schedules anything. Fetches only happen when the client urges
    /// them at the deadline.
    #[default]
    #[serde(rename = "null")]
    Null,

    /// Starts every fetch exactly at its deadline.
    #[serde(rename = "start-at-deadline")]
    StartAtDeadline,

    /// Packs fetches back to back assuming each request gets its full
    /// available byterate.
    #[serde(rename = "ignore-rate-prediction")]
    IgnoreRatePrediction,

    /// Packs fetches back to back, walking the predicted byterate backwards
    /// from the deadline.
    #[serde(rename = "respect-rate-prediction")]
    RespectRatePrediction,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 4] = [
        AlgorithmKind::Null,
        AlgorithmKind::StartAtDeadline,
        AlgorithmKind::IgnoreRatePrediction,
        AlgorithmKind::RespectRatePrediction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::Null => "null",
            AlgorithmKind::StartAtDeadline => "start-at-deadline",
            AlgorithmKind::IgnoreRatePrediction => "ignore-rate-prediction",
            AlgorithmKind::RespectRatePrediction => "respect-rate-prediction",
        }
    }
}

impl FromStr for AlgorithmKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_owned()))
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Algorithm choice and its string-keyed parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Algorithm {
    pub name: AlgorithmKind,

    /// Passed verbatim to the algorithm, e.g. `alpha = "0.8"`. Unknown keys
    /// are ignored by the algorithms.
    pub parameters: BTreeMap<String, String>,
}

impl Algorithm {
    /// Reject parameters the scenario text format cannot carry.
    pub fn validate(&self) -> Result<(), Error> {
        for (key, value) in &self.parameters {
            check_parameter(key, value)?;
        }
        Ok(())
    }
}

/// A parameter key or value must be a single non-empty token without `#`.
pub fn check_parameter(key: &str, value: &str) -> Result<(), Error> {
    let is_token = |text: &str| {
        !text.is_empty() && !text.chars().any(|c| c.is_whitespace() || c == '#')
    };
    if is_token(key) && is_token(value) {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }
}
