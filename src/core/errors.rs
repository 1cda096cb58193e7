//! Custom error types for translation operations

use thiserror::Error;

use crate::provider::TransportError;

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Input text is at or above the configured length limit
    #[error("Input too long: {length} characters (limit is {limit}, exclusive)")]
    InputTooLong {
        /// Character count of the input
        length: usize,
        /// Configured limit
        limit: usize,
    },

    /// Source and target languages are identical
    #[error("Source and target language are both '{lang}'")]
    SameLanguage {
        /// The repeated language
        lang: String,
    },

    /// Language code outside the supported set
    #[error("Unsupported language: {lang}")]
    UnsupportedLanguage {
        /// The rejected code
        lang: String,
    },

    /// Provider failed at the transport or protocol level
    #[error("Remote transport error: {0}")]
    RemoteTransport(#[from] TransportError),

    /// Response payload did not match the expected envelope
    #[error("Decode error: {message}")]
    Decode {
        /// Parser detail
        message: String,
    },

    /// Provider executed the request but reported a logical failure
    #[error("Remote error: {code} - {message}")]
    Remote {
        /// Provider error code
        code: String,
        /// Provider error message
        message: String,
    },

    /// The caller cancelled the operation
    #[error("Translation cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What is wrong
        message: String,
    },

    /// Wrapper for anyhow errors
    #[error("Internal error: {0}")]
    InternalError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl TranslationError {
    /// Whether a caller may reasonably retry the same request later.
    ///
    /// The gateway never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            TranslationError::RemoteTransport(e) => e.is_network(),
            TranslationError::Remote { code, .. } => {
                code.starts_with("RequestLimitExceeded") || code.starts_with("InternalError")
            }
            _ => false,
        }
    }

    /// Provider error code, if the provider reported one
    pub fn remote_code(&self) -> Option<&str> {
        match self {
            TranslationError::Remote { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for TranslationError {
    fn from(err: anyhow::Error) -> Self {
        TranslationError::InternalError(err.to_string())
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;
