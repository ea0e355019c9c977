#![forbid(unsafe_code)]

mod algorithm;
mod distribution;
mod error;
mod network;
mod prediction;
mod workload;

pub use algorithm::{Algorithm, AlgorithmKind, check_parameter};
pub use distribution::{Distribution, Quantity};
pub use error::Error;
pub use network::Network;
pub use prediction::Prediction;
pub use workload::{FixedRequest, RequestSeries};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of a generated scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Root seed of the generator. When absent the caller picks one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Number of simulated ticks.
    pub total_ticks: i64,

    /// Maximum distance between the current tick and a deadline for a
    /// request to be visible to the scheduler. Defaults to `total_ticks`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub look_ahead: Option<i64>,

    pub network: Network,
    pub prediction: Prediction,
    pub algorithm: Algorithm,
    pub request_series: Vec<RequestSeries>,
    pub requests: Vec<FixedRequest>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            total_ticks: 10_000,
            look_ahead: None,
            network: Network::default(),
            prediction: Prediction::default(),
            algorithm: Algorithm::default(),
            request_series: Vec::new(),
            requests: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. Missing fields are filled with defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let toml = toml_edit::ser::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Load configuration from multiple TOML files. Later files override
    /// earlier ones; `[[request_series]]` and `[[requests]]` accumulate.
    pub fn load_multiple<T, U>(paths: U) -> Result<Self, Error>
    where
        T: AsRef<Path>,
        U: IntoIterator<Item = T>,
    {
        let mut merged = toml_edit::DocumentMut::new();
        for path in paths {
            let text = std::fs::read_to_string(path)?;
            let doc: toml_edit::DocumentMut = text.parse()?;
            merge_document(&mut merged, doc);
        }
        merged.to_string().parse()
    }

    pub fn look_ahead(&self) -> i64 {
        self.look_ahead.unwrap_or(self.total_ticks)
    }

    /// Check ranges that the TOML types cannot express.
    pub fn validate(&self) -> Result<(), Error> {
        if self.total_ticks <= 0 {
            return Err(Error::NonPositiveTicks(self.total_ticks));
        }
        if let Some(look_ahead) = self.look_ahead
            && look_ahead < 0
        {
            return Err(Error::NegativeLookAhead(look_ahead));
        }
        if !(0.0..=1.0).contains(&self.network.uptime) {
            return Err(Error::InvalidUptime(self.network.uptime));
        }
        self.algorithm.validate()?;
        for (index, request) in self.requests.iter().enumerate() {
            let reason = if request.deadline < 0 {
                "negative deadline"
            } else if request.deadline >= self.total_ticks {
                "deadline beyond the last tick"
            } else if request.data == 0 {
                "zero data size"
            } else if request.byterate == 0 {
                "zero byterate"
            } else {
                continue;
            };
            return Err(Error::InvalidRequest { index, reason });
        }
        Ok(())
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml_edit::de::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

fn merge_document(target: &mut toml_edit::DocumentMut, source: toml_edit::DocumentMut) {
    for (key, item) in source.iter() {
        merge_item(
            target.entry(key).or_insert(toml_edit::Item::None),
            item.clone(),
        );
    }
}

fn merge_item(target: &mut toml_edit::Item, source: toml_edit::Item) {
    use toml_edit::Item;
    match (target, source) {
        (Item::Table(target_table), Item::Table(source_table)) => {
            for (key, item) in source_table.iter() {
                merge_item(target_table.entry(key).or_insert(Item::None), item.clone());
            }
        }
        (Item::ArrayOfTables(target_array), Item::ArrayOfTables(source_array)) => {
            for table in source_array.iter() {
                target_array.push(table.clone());
            }
        }
        (target_item, source_item) => {
            *target_item = source_item;
        }
    }
}
