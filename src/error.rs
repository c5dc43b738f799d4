//! Error types
//!
//! Two families live here:
//! - [`RegistryError`] covers registry assembly and lookup. Nothing in it is
//!   fatal to the host process; callers get typed results they can fall back on.
//! - [`LlmError`] covers a chat-completion call made through a resolved handle.

use thiserror::Error;

use crate::credentials::CredentialField;

/// Errors raised while assembling or querying the model registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A field the provider marks as required is absent or empty.
    #[error("{provider}: missing required credential {field}")]
    MissingCredential {
        provider: String,
        field: CredentialField,
    },

    /// The identifier was never registered.
    #[error("unknown model identifier: {0}")]
    UnknownIdentifier(String),

    /// The provider client failed to materialize a handle.
    #[error("failed to construct handle for '{identifier}' via {provider}: {message}")]
    HandleConstruction {
        identifier: String,
        provider: String,
        message: String,
    },

    /// A vendor model name the client refuses to accept.
    #[error("{provider}: invalid vendor model name '{name}'")]
    InvalidModelName { provider: String, name: String },

    /// The same identifier appears twice in a catalog.
    #[error("duplicate model identifier: {0}")]
    DuplicateIdentifier(String),

    /// Invalid configuration (headers, proxy, endpoints).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed catalog JSON.
    #[error("invalid catalog: {0}")]
    Catalog(#[from] serde_json::Error),

    /// Catalog file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Tracing subscriber could not be installed.
    #[error("telemetry initialization error: {0}")]
    Telemetry(String),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors returned by a chat-completion call.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Transport failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The vendor answered with a non-success status.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// The vendor rejected the credentials.
    #[error("authentication error: {0}")]
    AuthenticationError(String),

    /// The response body did not have the expected shape.
    #[error("parse error: {0}")]
    ParseError(String),
}

impl LlmError {
    /// Build an [`LlmError::ApiError`] without details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Whether a caller could reasonably retry the same request.
    ///
    /// Only a classification; no retry policy is applied anywhere in this crate.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(_) => true,
            Self::ApiError { code, .. } => *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}
