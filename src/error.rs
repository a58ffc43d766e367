//! Error types for macroloop
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur while driving an activity loop
#[derive(Debug, Error)]
pub enum MacroError {
    /// A host call was rejected or referred to something that no longer exists
    #[error("Host error: {0}")]
    Host(String),

    /// Configuration was loaded but is not usable
    #[error("Config error: {0}")]
    Config(String),

    /// A simulation scenario is malformed
    #[error("Scenario error: {0}")]
    Scenario(String),

    /// Invalid state transition or operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for macroloop operations
pub type Result<T> = std::result::Result<T, MacroError>;
