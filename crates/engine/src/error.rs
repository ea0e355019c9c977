#![forbid(unsafe_code)]

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("bound must be positive, got {0}")]
    NonPositiveBound(i32),

    #[error("invalid value `{value}` for algorithm parameter `{key}`")]
    InvalidParameter { key: String, value: String },

    #[error("scenario line {line}: {source}")]
    Scenario {
        line: usize,
        #[source]
        source: ScenarioError,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a scenario line is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScenarioError {
    #[error("missing command after tick")]
    MissingCommand,

    #[error("could not parse tick `{0}`")]
    InvalidTick(String),

    #[error("negative tick {0}")]
    NegativeTick(i64),

    #[error("ticks out of order: {found} < {previous}")]
    OutOfOrder { previous: i64, found: i64 },

    #[error("no events after `end` are allowed")]
    AfterEnd,

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("usage is `{0}`")]
    Usage(&'static str),

    #[error("`{0}` must be set at tick 0")]
    NotAtStart(&'static str),

    #[error("could not parse number `{0}`")]
    InvalidNumber(String),

    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),

    #[error("requests need a positive data size and byterate")]
    InvalidRequest,
}
