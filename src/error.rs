//! Error handling module for the resolver
//!
//! Resolver operations themselves never fail: malformed CMS content is
//! filtered out and bad user input becomes a per-field message. These types
//! cover the edges where data is loaded from disk or looked up by id.

use thiserror::Error;

/// Main error type for the storefront resolver
#[derive(Error, Debug)]
pub enum ResolverError {
    /// IO errors (reading option exports, settings files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON syntax or shape errors in an export as a whole
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid resolver settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// An option id that is not part of the loaded tree
    #[error("Unknown option: {0}")]
    UnknownOption(String),
}

/// Result type alias for resolver operations
pub type Result<T> = std::result::Result<T, ResolverError>;

impl ResolverError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unknown option error
    pub fn unknown_option(id: impl Into<String>) -> Self {
        Self::UnknownOption(id.into())
    }
}
