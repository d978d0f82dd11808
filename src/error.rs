//! Error types for haetae
//!
//! All modules use `HaetaeResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for haetae operations
pub type HaetaeResult<T> = Result<T, HaetaeError>;

/// All errors that can occur in haetae
#[derive(Error, Debug)]
pub enum HaetaeError {
    // Configuration errors
    #[error("Config file could not be resolved: {0}")]
    ConfigResolution(String),

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigValidation { path: PathBuf, reason: String },

    #[error("Command not found in config: {0}")]
    CommandNotFound(String),

    // Store errors
    #[error("Store file {path} is not valid JSON: {source}")]
    StoreParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot serialize {context}: {source}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // Producer errors
    #[error(
        "commands.{command}.run returned reserved key \"{key}\". The keys \"time\" and \"env\" are filled in by haetae"
    )]
    ReservedKey { command: String, key: String },

    #[error("{producer} produced invalid output: {reason}")]
    ProducerOutput { producer: String, reason: String },

    #[error("Producer command failed: {command}, exit code: {code}, stderr: {stderr}")]
    ProducerFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    User(String),
}

impl HaetaeError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a config validation error
    pub fn invalid_config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConfigValidation {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigResolution(_) => Some(
                "Run: haetae init, or pass --config / set $HAETAE_CONFIG_FILE",
            ),
            Self::StoreParse { .. } => {
                Some("Fix or delete the store file; a missing store is recreated")
            }
            Self::ReservedKey { .. } => Some("Rename the field in the run command's output"),
            Self::CommandNotFound(_) => Some("Add it under [commands.<name>] in haetae.config.toml"),
            _ => None,
        }
    }
}
