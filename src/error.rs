use std::io;
use std::str::Utf8Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine path to config file")]
    NoConfigPath,

    #[error("Failed to encode/decode config as utf-8: {source}")]
    Utf8Error { #[from] source: Utf8Error },

    #[error("Failed to read config file: {source}")]
    IOError { #[from] source: io::Error },

    #[error("Failed to parse config file: {source}")]
    JsonError { #[from] source: serde_json::Error },

    #[error("Failed to parse \"{value}\" as a UUID: {source}")]
    InvalidUuid { value: String, source: uuid::Error },
}

impl ConfigError {
    pub fn is_file_not_found_error(&self) -> bool {
        match self {
            ConfigError::IOError { source } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum BleError {
    /// A low-level adapter command was rejected by the platform stack.
    #[error("BLE adapter command failed: {0}")]
    Adapter(String),

    /// A command that requires an active link was issued without one.
    /// This is a programming-contract violation, not a radio failure.
    #[error("Not connected to a BLE device")]
    NotConnected,

    #[error("A required bluetooth characteristic is not available")]
    MissingCharacteristic,
}
