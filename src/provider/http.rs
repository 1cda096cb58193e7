//! HTTP provider speaking the TextTranslate JSON protocol

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::{TextTranslateRequest, TranslationProvider, TransportError, TransportErrorKind};
use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};

const ACTION: &str = "TextTranslate";
const API_VERSION: &str = "2018-03-21";

/// Provider backed by a `reqwest` client.
///
/// Requests are not signed here. `authorization` is sent verbatim when set,
/// otherwise the endpoint is expected to be a signing proxy.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    /// Shared HTTP client
    client: reqwest::Client,
    /// Endpoint URL
    endpoint: String,
    /// `X-TC-Region` value
    region: String,
    /// `X-TC-Language` value
    language: String,
    /// Verbatim `Authorization` header value
    authorization: Option<String>,
}

impl HttpProvider {
    /// Build a provider from configuration
    pub fn new(config: &TranslatorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TranslationError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            region: config.region.clone(),
            language: config.language.clone(),
            authorization: config.authorization.clone(),
        })
    }

    /// Endpoint requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Map a reqwest failure to a transport error category
fn classify(err: reqwest::Error) -> TransportError {
    let kind = if err.is_builder() || err.is_decode() {
        TransportErrorKind::Protocol
    } else {
        TransportErrorKind::Network
    };
    TransportError::new(kind, err.to_string())
}

#[async_trait]
impl TranslationProvider for HttpProvider {
    fn name(&self) -> &'static str {
        "tencent-tmt"
    }

    async fn text_translate(
        &self,
        request: &TextTranslateRequest,
    ) -> std::result::Result<String, TransportError> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("X-TC-Action", ACTION)
            .header("X-TC-Version", API_VERSION)
            .header("X-TC-Region", &self.region)
            .header("X-TC-Language", &self.language)
            .json(request);

        if let Some(auth) = &self.authorization {
            builder = builder.header(AUTHORIZATION, auth);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let body = response.text().await.map_err(classify)?;

        debug!("{} responded with {} ({} bytes)", self.endpoint, status, body.len());

        if status.is_success() {
            return Ok(body);
        }

        warn!("Provider returned HTTP {}", status);
        let kind = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TransportErrorKind::Auth,
            _ => TransportErrorKind::Protocol,
        };
        Err(TransportError::new(kind, format!("HTTP {}: {}", status.as_u16(), body)))
    }
}
