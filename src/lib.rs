//! TMT Translator - rate-limited machine translation client
//!
//! This library wraps a remote machine translation provider behind a
//! gateway that validates input, throttles calls to a fixed QPS ceiling,
//! and unwraps the provider's response envelope into a plain result.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod core;
pub mod provider;

// Re-export key types for convenience
pub use crate::core::{
    config::TranslatorConfig,
    errors::{Result, TranslationError},
    gateway::TranslationGateway,
    models::{Lang, TranslationRequest, TranslationResult},
    rate_limiter::RateLimiter,
};

pub use crate::provider::{
    HttpProvider, TextTranslateRequest, TranslateOutcome, TranslationProvider, TransportError,
    TransportErrorKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
