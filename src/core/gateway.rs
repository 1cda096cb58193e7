//! Throttled translation gateway

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::config::TranslatorConfig;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{Lang, TranslationRequest, TranslationResult};
use crate::core::rate_limiter::RateLimiter;
use crate::provider::{HttpProvider, TextTranslateRequest, TranslateOutcome, TranslationProvider};

/// Validates, throttles, and forwards translation requests to a provider
#[derive(Clone)]
pub struct TranslationGateway {
    /// Remote translation backend
    provider: Arc<dyn TranslationProvider>,
    /// Call throttle shared by all clones
    limiter: Arc<RateLimiter>,
    /// Exclusive upper bound on input length
    length_limit: usize,
    /// Project id sent with every request
    project_id: i64,
}

impl TranslationGateway {
    /// Create a gateway around an existing provider and limiter
    pub fn new(
        provider: Arc<dyn TranslationProvider>,
        limiter: Arc<RateLimiter>,
        length_limit: usize,
    ) -> Self {
        Self {
            provider,
            limiter,
            length_limit,
            project_id: 0,
        }
    }

    /// Project id sent with every request
    pub fn with_project_id(mut self, project_id: i64) -> Self {
        self.project_id = project_id;
        self
    }

    /// Build an HTTP-backed gateway from configuration
    pub fn from_config(config: &TranslatorConfig) -> Result<Self> {
        config.validate()?;

        let provider = Arc::new(HttpProvider::new(config)?);
        let limiter = Arc::new(RateLimiter::from_config(config));

        info!(
            "Translation gateway ready: endpoint={}, interval={:?}, length_limit={}",
            provider.endpoint(),
            limiter.interval(),
            config.length_limit
        );

        Ok(Self::new(provider, limiter, config.length_limit).with_project_id(config.project_id))
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        let config = TranslatorConfig::from_env()?;
        Self::from_config(&config)
    }

    /// Shared rate limiter
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Exclusive upper bound on input length, in characters
    pub fn length_limit(&self) -> usize {
        self.length_limit
    }

    /// English to Chinese
    pub async fn translate_en_to_zh(&self, text: &str) -> Result<TranslationResult> {
        self.translate(Lang::En, Lang::Zh, text).await
    }

    /// Chinese to English
    pub async fn translate_zh_to_en(&self, text: &str) -> Result<TranslationResult> {
        self.translate(Lang::Zh, Lang::En, text).await
    }

    /// Translate `text` from `source` to `target`
    pub async fn translate(&self, source: Lang, target: Lang, text: &str) -> Result<TranslationResult> {
        let request = TranslationRequest::new(source, target, text);
        self.execute(&request, None).await
    }

    /// Like [`translate`](Self::translate), aborting the throttle wait or the
    /// in-flight call when `cancel` fires
    pub async fn translate_with_cancel(
        &self,
        source: Lang,
        target: Lang,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<TranslationResult> {
        let request = TranslationRequest::new(source, target, text);
        self.execute(&request, Some(cancel)).await
    }

    /// Translate requests one after another through the limiter
    pub async fn translate_batch(
        &self,
        requests: &[TranslationRequest],
    ) -> Vec<Result<TranslationResult>> {
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            results.push(self.execute(request, None).await);
        }

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!("Batch finished: {} ok, {} failed", results.len() - failed, failed);

        results
    }

    /// Reject input the provider would refuse
    fn validate(&self, request: &TranslationRequest) -> Result<()> {
        let length = request.char_len();
        if length >= self.length_limit {
            return Err(TranslationError::InputTooLong {
                length,
                limit: self.length_limit,
            });
        }

        if request.source_lang == request.target_lang {
            return Err(TranslationError::SameLanguage {
                lang: request.source_lang.to_string(),
            });
        }

        Ok(())
    }

    /// Validate, throttle, call, and unwrap one request
    async fn execute(
        &self,
        request: &TranslationRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<TranslationResult> {
        self.validate(request)?;

        let mut permit = tokio::select! {
            biased;
            _ = cancelled(cancel) => return Err(TranslationError::Cancelled),
            permit = self.limiter.acquire() => permit,
        };

        tokio::select! {
            biased;
            _ = cancelled(cancel) => return Err(TranslationError::Cancelled),
            _ = permit.wait() => {}
        }

        let wire = TextTranslateRequest::new(request, self.project_id);

        // the permit records the call's elapsed time when dropped, on every exit path
        let response = tokio::select! {
            biased;
            _ = cancelled(cancel) => None,
            response = self.provider.text_translate(&wire) => Some(response),
        };

        drop(permit);

        let body = match response {
            Some(Ok(body)) => body,
            Some(Err(e)) => {
                warn!("{} transport failure: {}", self.provider.name(), e);
                return Err(e.into());
            }
            None => {
                debug!("Translation cancelled while in flight");
                return Err(TranslationError::Cancelled);
            }
        };

        match TranslateOutcome::from_json(&body)? {
            TranslateOutcome::Success {
                request_id,
                source,
                target,
                target_text,
            } => {
                debug!("Translated request {} ({} -> {})", request_id, source, target);
                Ok(TranslationResult {
                    request_id,
                    source_lang: source,
                    target_lang: target,
                    translated_text: target_text,
                })
            }
            TranslateOutcome::Failure {
                request_id,
                code,
                message,
            } => {
                warn!("Request {} rejected by provider: {} - {}", request_id, code, message);
                Err(TranslationError::Remote { code, message })
            }
        }
    }
}

/// Resolves when `token` is cancelled; never resolves without one
async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}
