//! Remote translation provider boundary

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod http;
pub mod wire;

pub use http::HttpProvider;
pub use wire::{TextTranslateRequest, TranslateOutcome};

/// Category of a transport-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Credentials or signature rejected
    Auth,
    /// Connection, DNS, or timeout failure
    Network,
    /// Malformed request or unexpected HTTP status
    Protocol,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportErrorKind::Auth => write!(f, "auth"),
            TransportErrorKind::Network => write!(f, "network"),
            TransportErrorKind::Protocol => write!(f, "protocol"),
        }
    }
}

/// Failure reported by the provider before any envelope was produced
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct TransportError {
    /// Failure category
    pub kind: TransportErrorKind,
    /// Underlying detail
    pub message: String,
}

impl TransportError {
    /// Create a transport error
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether the failure was a connection or timeout problem
    pub fn is_network(&self) -> bool {
        self.kind == TransportErrorKind::Network
    }
}

/// A machine translation backend.
///
/// Implementations return the raw JSON response envelope; interpreting it
/// is left to the gateway.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Submit one text translation request
    async fn text_translate(
        &self,
        request: &TextTranslateRequest,
    ) -> Result<String, TransportError>;
}
