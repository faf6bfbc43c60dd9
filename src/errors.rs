/*!
 * Error types for the panelkit library.
 *
 * This module contains custom error types for the different layers of the
 * client, using the thiserror crate for ergonomic error definitions.
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of a server-side validation failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDetail {
    /// Location of the offending field, e.g. `["body", "email"]`
    #[serde(default)]
    pub loc: Vec<serde_json::Value>,

    /// Human readable message
    pub msg: String,

    /// Machine readable error type
    #[serde(rename = "type", default)]
    pub error_type: String,
}

impl ValidationDetail {
    /// Render the location as a dotted path (`body.email`)
    pub fn location(&self) -> String {
        self.loc
            .iter()
            .map(|part| match part {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Errors that can occur when talking to the REST collaborators
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused connection, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server rejected the credentials or the bearer token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Field-level validation failure returned by the server
    #[error("Validation failed: {}", first_message(.0))]
    Validation(Vec<ValidationDetail>),

    /// Any other non-success status (not found, conflict, bad request...)
    #[error("API responded with error: {status_code} - {message}")]
    Status {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// The response body could not be decoded
    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

fn first_message(details: &[ValidationDetail]) -> &str {
    details.first().map(|d| d.msg.as_str()).unwrap_or("unknown field")
}

impl ApiError {
    /// Whether the error is an unauthorized (401) response
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// HTTP status code carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Validation(_) => Some(422),
            Self::Status { status_code, .. } => Some(*status_code),
            Self::Transport(_) | Self::Parse(_) => None,
        }
    }

    /// The message a user should see for this error.
    ///
    /// Validation lists surface their first message; server details are
    /// passed through; anything else falls back to the given translation key.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(details) => details
                .first()
                .map(|d| d.msg.clone())
                .unwrap_or_else(|| fallback.to_string()),
            Self::Status { message, .. } | Self::Unauthorized(message) if !message.is_empty() => {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Parse(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

/// Errors surfaced by the session manager
#[derive(Error, Debug)]
pub enum SessionError {
    /// Error from the authentication collaborator
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Error reading or writing persisted tokens
    #[error("Storage error: {0}")]
    Storage(String),

    /// OAuth callback without both tokens
    #[error("OAuth tokens missing")]
    MissingTokens,

    /// Operation requires a live session
    #[error("Not logged in")]
    NotLoggedIn,

    /// Operation not available for this account (e.g. password change on an
    /// OAuth account); carries the translation key describing why
    #[error("Operation not available: {0}")]
    Unsupported(String),
}

impl From<anyhow::Error> for SessionError {
    fn from(error: anyhow::Error) -> Self {
        Self::Storage(format!("{:#}", error))
    }
}

/// Errors that can occur while resolving translations
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the translations collaborator
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// No table has been loaded for the language
    #[error("Translations not loaded for language: {0}")]
    NotLoaded(String),

    /// The language code is not a valid table key
    #[error("Invalid language: {0}")]
    InvalidLanguage(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from an API call
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Error from the session layer
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Error from translation resolution
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
