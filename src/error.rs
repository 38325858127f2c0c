// src/error.rs

//! Unified error handling for the speedcams pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Boxed cause carried by transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Network failure or timeout while fetching a page
    #[error("Transport error for {url}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    /// The server answered with a non-2xx status
    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// The fetched markup could not be read as a document
    #[error("Parse error for {context}: {message}")]
    Parse { context: String, message: String },

    /// The search results did not contain a bulletin link
    #[error("No bulletin link found in {url}")]
    LinkNotFound { url: String },

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Notification delivery failed
    #[error("Notification error: {0}")]
    Notify(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A whole-run failure tagged with the step that produced it
    #[error("Failed to {stage}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<AppError>,
    },
}

/// Coarse classification of an [`AppError`], looking through [`AppError::Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    HttpStatus,
    Parse,
    LinkNotFound,
    Config,
    Notify,
    Serialization,
    Io,
}

impl AppError {
    /// Create a transport error from any underlying cause.
    pub fn transport(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Create a parse error with context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
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

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a notification error.
    pub fn notify(message: impl Into<String>) -> Self {
        Self::Notify(message.into())
    }

    /// Wrap this error with the pipeline step that failed.
    pub fn in_stage(self, stage: &'static str) -> Self {
        Self::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// Classify the innermost error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::Parse { .. } | Self::Selector { .. } => ErrorKind::Parse,
            Self::LinkNotFound { .. } => ErrorKind::LinkNotFound,
            Self::Config(_) | Self::Validation(_) | Self::Toml(_) => {
                ErrorKind::Config
            }
            Self::Notify(_) => ErrorKind::Notify,
            Self::Json(_) => ErrorKind::Serialization,
            Self::Io(_) => ErrorKind::Io,
            Self::Stage { source, .. } => source.kind(),
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        let url = e.url().map(|u| u.to_string()).unwrap_or_default();
        Self::transport(url, e)
    }
}
