use thiserror::Error;

/// Failures while assembling the configuration or installing the subscriber.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML file or a `ROI_` variable could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
