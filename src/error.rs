// src/error.rs

//! Unified error handling for the watcher application.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed text that a normalization helper could not interpret
    #[error("invalid {what}: {value:?}")]
    InvalidInput { what: String, value: String },

    /// Listing ID absent from the snapshot store
    #[error("listing {id} not found in snapshot")]
    NotFound { id: String },

    /// A page-driver wait exceeded its bound
    #[error("timed out after {secs}s waiting for {waiting_for}")]
    Timeout { waiting_for: String, secs: u64 },

    /// Login handshake failed; fatal to the current session
    #[error("authentication failed: {0}")]
    Auth(String),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Scraping error
    #[error("Scrape error for {context}: {message}")]
    Scrape { context: String, message: String },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl AppError {
    /// Create an invalid-input error.
    pub fn invalid_input(what: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidInput {
            what: what.into(),
            value: value.into(),
        }
    }

    /// Create a not-found error for a listing ID.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a timeout error.
    pub fn timeout(waiting_for: impl Into<String>, secs: u64) -> Self {
        Self::Timeout {
            waiting_for: waiting_for.into(),
            secs,
        }
    }

    /// Create an authentication error.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a scrape error with context.
    pub fn scrape(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Scrape {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// True for errors the poll loop treats as non-fatal (retry next cycle).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
