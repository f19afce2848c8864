// ABOUTME: Defines all error types for the realnex library using thiserror.
// ABOUTME: Each component has its own error enum, unified under Error.

use std::time::Duration;

/// Top-level error type for the realnex library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("CRM error: {0}")]
    Crm(#[from] CrmError),

    #[error("Validator error: {0}")]
    Validator(#[from] ValidatorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from CRM fetch and mutation calls. None of these are retried.
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CRM returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

/// Errors from a single phone lookup.
///
/// These never escape a batch; the validator renders them into the output slot.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("validator returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors loading configuration from the environment or a file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting: {0}")]
    Missing(String),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
