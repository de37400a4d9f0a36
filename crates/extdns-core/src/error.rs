//! Error types for the extdns system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for extdns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the extdns system
#[derive(Error, Debug)]
pub enum Error {
    /// Listing cluster resources failed (network, auth or API error)
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// A DNS backend read or write failed
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a retrieval error
    pub fn retrieval(msg: impl Into<String>) -> Self {
        Self::Retrieval(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors raised while listing cluster resources
    pub fn is_retrieval(&self) -> bool {
        matches!(self, Self::Retrieval(_))
    }

    /// True for errors raised by a DNS backend
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}
