//! Error types for paged-view
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// Message shown to the user when a fetch fails for any transport reason
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data. Check the server.";

/// The main error type for paged-view
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Unknown pagination strategy: {name}")]
    UnknownStrategy { name: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    // ============================================================================
    // Navigation Errors
    // ============================================================================
    #[error("Invalid navigation: {message}")]
    InvalidNavigation { message: String },

    #[error("Page size {size} is not one of the allowed sizes {allowed:?}")]
    InvalidPageSize { size: u32, allowed: Vec<u32> },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create an invalid navigation error
    pub fn navigation(message: impl Into<String>) -> Self {
        Self::InvalidNavigation {
            message: message.into(),
        }
    }

    /// Check if this error came from talking to the listing endpoint.
    ///
    /// Transport failures are reported to the user as a single fetch-failed
    /// message and leave rows and position untouched.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::HttpStatus { .. }
                | Error::Timeout { .. }
                | Error::MalformedResponse { .. }
        )
    }

    /// Check if this error was raised by a disabled navigation control
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Error::InvalidNavigation { .. } | Error::InvalidPageSize { .. }
        )
    }
}

/// Result type alias for paged-view
pub type Result<T> = std::result::Result<T, Error>;
