use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse config file: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid socket address: {0}")]
    InvalidAddress(String),

    #[error("Failed to read sensor at {path}: {reason}")]
    SensorRead { path: String, reason: String },

    #[error("GUI error: {0}")]
    Gui(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
