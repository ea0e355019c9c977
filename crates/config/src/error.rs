#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Empty distribution")]
    EmptyDistribution,

    #[error("Unknown distribution: {0}")]
    UnknownDistribution(String),

    #[error("Expected {expected} parameters for {kind} distribution, got {found}")]
    DistributionArity {
        kind: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Uniform distribution has min {min} greater than max {max}")]
    InvalidUniformRange { min: String, max: String },

    #[error("Normal distribution has negative standard deviation {0}")]
    NegativeDeviation(String),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Algorithm parameter `{key}` = `{value}` must be non-empty and free of whitespace and `#`")]
    InvalidParameter { key: String, value: String },

    #[error("Total ticks must be positive, got {0}")]
    NonPositiveTicks(i64),

    #[error("Look-ahead time must not be negative, got {0}")]
    NegativeLookAhead(i64),

    #[error("Network uptime must be within [0, 1], got {0}")]
    InvalidUptime(f64),

    #[error("Request #{index} is invalid: {reason}")]
    InvalidRequest { index: usize, reason: &'static str },

    #[error("Failed to serialize TOML: {0}")]
    SerializeTOML(#[from] toml_edit::ser::Error),

    #[error("Failed to deserialize TOML: {0}")]
    DeserializeTOML(#[from] toml_edit::de::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseTOML(#[from] toml_edit::TomlError),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}
