//! Error Handling
//!
//! Error type definitions used in ghlabel

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error types for ghlabel
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing local configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The token cannot see the repository, or the repository does not exist
    #[error(
        "Failed to access `{repository}` (HTTP {status}). Check if the token has permission to access the repository"
    )]
    AuthOrNotFound { repository: String, status: u16 },

    #[error("`{url}` took too long to respond. Try checking the connection")]
    NetworkTimeout { url: String },

    /// A single create or update was rejected by GitHub
    #[error("GitHub rejected label `{name}` (HTTP {status}): {message}")]
    Validation {
        name: String,
        status: u16,
        message: String,
    },

    #[error("Failed to delete label `{name}` (HTTP {status})")]
    NotFound { name: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config(message.into())
    }

    /// Whether this error must abort the whole run
    ///
    /// Per-item rejections (`Validation`, `NotFound`) are recorded and the
    /// remaining items are still processed.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Validation { .. } | Error::NotFound { .. })
    }
}
