//! Wire format of the TextTranslate action
//!
//! Success:
//! `{"Response": {"RequestId": "...", "Source": "en", "Target": "zh", "TargetText": "..."}}`
//!
//! Logical failure, still delivered as a transport success:
//! `{"Response": {"RequestId": "...", "Error": {"Code": "...", "Message": "..."}}}`

use serde::{Deserialize, Serialize};

use crate::core::errors::TranslationError;
use crate::core::models::{Lang, TranslationRequest};

/// Request body of the TextTranslate action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TextTranslateRequest {
    /// Text to translate
    pub source_text: String,
    /// Source language
    pub source: Lang,
    /// Target language
    pub target: Lang,
    /// Provider project id
    pub project_id: i64,
}

impl TextTranslateRequest {
    /// Build the wire request for a translation request
    pub fn new(request: &TranslationRequest, project_id: i64) -> Self {
        Self {
            source_text: request.text.clone(),
            source: request.source_lang,
            target: request.target_lang,
            project_id,
        }
    }
}

/// Top-level `{"Response": ...}` wrapper
#[derive(Debug, Deserialize)]
struct Envelope {
    /// Response body
    #[serde(rename = "Response")]
    response: ResponseBody,
}

/// Union of the success and failure response fields
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ResponseBody {
    /// Provider request id
    #[serde(default)]
    request_id: String,
    /// Source language
    source: Option<String>,
    /// Target language
    target: Option<String>,
    /// Translated text
    target_text: Option<String>,
    /// Logical failure, if any
    error: Option<ErrorBody>,
}

/// Provider-reported failure
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ErrorBody {
    /// Error code, empty when there is no error
    #[serde(default)]
    code: String,
    /// Human-readable message
    #[serde(default)]
    message: String,
}

/// Decoded response envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateOutcome {
    /// The provider translated the text
    Success {
        /// Provider request id
        request_id: String,
        /// Source language
        source: String,
        /// Target language
        target: String,
        /// Translated text
        target_text: String,
    },
    /// The provider executed the request but rejected it
    Failure {
        /// Provider request id
        request_id: String,
        /// Error code
        code: String,
        /// Error message
        message: String,
    },
}

impl TranslateOutcome {
    /// Decode a raw envelope body
    pub fn from_json(body: &str) -> Result<Self, TranslationError> {
        let envelope: Envelope =
            serde_json::from_str(body).map_err(|e| TranslationError::Decode {
                message: e.to_string(),
            })?;
        let response = envelope.response;

        if let Some(error) = response.error.filter(|e| !e.code.is_empty()) {
            return Ok(TranslateOutcome::Failure {
                request_id: response.request_id,
                code: error.code,
                message: error.message,
            });
        }

        let target_text = response.target_text.ok_or_else(|| TranslationError::Decode {
            message: "Response has neither TargetText nor Error".to_string(),
        })?;

        Ok(TranslateOutcome::Success {
            request_id: response.request_id,
            source: response.source.unwrap_or_default(),
            target: response.target.unwrap_or_default(),
            target_text,
        })
    }

    /// Provider request id of either outcome
    pub fn request_id(&self) -> &str {
        match self {
            TranslateOutcome::Success { request_id, .. } => request_id,
            TranslateOutcome::Failure { request_id, .. } => request_id,
        }
    }
}
