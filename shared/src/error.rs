//! Error types for the product search Lambda.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

pub const INVALID_QUERY_MESSAGE: &str = "Invalid search query.";
pub const MISSING_API_KEY_MESSAGE: &str = "Server is missing API key configuration.";
pub const SAFETY_BLOCKED_MESSAGE: &str =
    "The request was blocked for safety reasons. Please adjust your query.";
pub const SERVER_ERROR_MESSAGE: &str = "An error occurred on the server.";

/// Errors that can occur while answering a search request.
#[derive(Error, Debug)]
pub enum Error {
    /// Body missing, not JSON, or without a usable `userQuery`
    #[error("Invalid search query")]
    InvalidQuery,

    /// `GEMINI_API_KEY` not present in the environment
    #[error("Configuration error: missing API key")]
    MissingApiKey,

    /// Upstream answered with a non-success status and a readable error body
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Upstream refused to answer on content policy grounds
    #[error("Upstream blocked the request for safety reasons")]
    SafetyBlocked,

    /// Upstream answered 2xx but without anything we can return
    #[error("Invalid response from AI service: {0}")]
    InvalidUpstreamResponse(String),

    /// Network or body decoding failure on the upstream call
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidQuery | Error::SafetyBlocked => 400,
            Error::Upstream { status, .. } => *status,
            _ => 500,
        }
    }

    /// Message safe to return to the caller.
    ///
    /// Only the upstream error message is relayed; every other internal detail stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Error::InvalidQuery => INVALID_QUERY_MESSAGE.to_string(),
            Error::MissingApiKey => MISSING_API_KEY_MESSAGE.to_string(),
            Error::Upstream { message, .. } => format!("API Error: {}", message),
            Error::SafetyBlocked => SAFETY_BLOCKED_MESSAGE.to_string(),
            Error::InvalidUpstreamResponse(_) | Error::Transport(_) | Error::Serialization(_) => {
                SERVER_ERROR_MESSAGE.to_string()
            }
        }
    }
}
