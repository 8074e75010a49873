use shared_utils::config::ConfigError;
use thiserror::Error;

/// The unified error type for the `market_sim` crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Generation or configuration parameters are out of range
    /// (e.g., a zero bar count or a non-positive start price).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An operation was attempted on a series that cannot support it
    /// (e.g., ticking an empty series).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// The presentation sink refused a redraw. The live feed ends on this.
    #[error("Chart sink failed: {0}")]
    Sink(#[source] Box<Error>),

    /// An error related to configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A generic I/O error.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`SimConfig`](crate::config::SimConfig).
    #[error("Failed to parse configuration")]
    Toml(#[from] toml::de::Error),

    /// A chart frame could not be serialized.
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
