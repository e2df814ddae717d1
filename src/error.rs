// src/error.rs

//! Unified error handling for the crawler application.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// SQLite operation failed
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Page unreachable after bounded retries
    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    /// Malformed page content
    #[error("Extraction failed for {page}: {message}")]
    Extraction { page: String, message: String },

    /// A quote references an author absent from the store
    #[error("Author '{name}' not found in the store")]
    UnresolvedAuthor { name: String },

    /// Staging pair could not be written or read
    #[error("Staging error: {0}")]
    Staging(String),

    /// The store rejected a write the engine believed was absent
    #[error("Constraint violation on {entity}: {message}")]
    Constraint { entity: String, message: String },
}

impl AppError {
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

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error with the page URL as context.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an extraction error with the page URL as context.
    pub fn extraction(page: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Extraction {
            page: page.into(),
            message: message.to_string(),
        }
    }

    /// Create an unresolved-author error.
    pub fn unresolved_author(name: impl Into<String>) -> Self {
        Self::UnresolvedAuthor { name: name.into() }
    }

    /// Create a staging error.
    pub fn staging(message: impl Into<String>) -> Self {
        Self::Staging(message.into())
    }

    /// Create a constraint-violation error for a stored entity.
    pub fn constraint(entity: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Constraint {
            entity: entity.into(),
            message: message.to_string(),
        }
    }
}
