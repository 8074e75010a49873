use thiserror::Error;

/// Errors raised while resolving configuration from the process environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable required by the application is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable is set but its value could not be parsed.
    #[error("Invalid value {value:?} for environment variable {name}: {reason}")]
    InvalidEnvVar {
        name: String,
        value: String,
        reason: String,
    },
}
