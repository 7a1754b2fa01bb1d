//! Error types shared by the viewer session and configuration loader

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    #[error("Model not yet loaded, ignoring {0}")]
    ModelNotLoaded(&'static str),
    #[error("Model load already completed for {0}")]
    LoadAlreadyCompleted(String),
    #[error("Unknown graphics level: {0}")]
    UnknownGraphicsLevel(String),
    #[error("Unknown background: {0}")]
    UnknownBackground(String),
}

/// Failure reported by the asset loader for the session's model
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to load model {path}: {message}")]
pub struct LoadError {
    pub path: String,
    pub message: String,
}

impl LoadError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] toml::ser::Error),
}
