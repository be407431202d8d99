// src/error.rs

//! Unified error handling for the tracker application.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
///
/// Every variant is fatal for the run. The only recovered failures
/// (unreadable watermark, duplicate status) never become an `AppError`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Settings file problem detected before any network activity
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing a local file failed
    #[error("Failed to write {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Tracker page answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Settings file is not valid INI
    #[error("Settings parse error: {0}")]
    Ini(#[from] ini::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// A tracker card no longer has the expected shape
    #[error("{message}\nHTML:\n{html}")]
    Markup { message: String, html: String },

    /// Status message could not be built within the length limit
    #[error("Message error: {0}")]
    Message(String),

    /// Request signing failed
    #[error("Signing error: {0}")]
    Auth(String),

    /// Status endpoint rejected the update
    #[error("Publish failed with HTTP {status}: {body}")]
    Publish { status: u16, body: String },
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

    /// Create a markup error carrying the offending card.
    pub fn markup(message: impl Into<String>, html: impl Into<String>) -> Self {
        Self::Markup {
            message: message.into(),
            html: html.into(),
        }
    }

    /// Create a message construction error.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    /// Create a storage write error for `path`.
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }
}
