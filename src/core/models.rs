//! Core data models for translation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::TranslationError;

/// Supported language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// English
    En,
    /// Simplified Chinese
    Zh,
}

impl Lang {
    /// Provider language code
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Zh => "zh",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lang {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "zh" => Ok(Lang::Zh),
            _ => Err(TranslationError::UnsupportedLanguage { lang: s.to_string() }),
        }
    }
}

/// Translation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Language of `text`
    pub source_lang: Lang,
    /// Language to translate into
    pub target_lang: Lang,
    /// Text to translate
    pub text: String,
}

impl TranslationRequest {
    /// Create a request for an arbitrary direction
    pub fn new(source_lang: Lang, target_lang: Lang, text: impl Into<String>) -> Self {
        Self {
            source_lang,
            target_lang,
            text: text.into(),
        }
    }

    /// English to Chinese request
    pub fn en_to_zh(text: impl Into<String>) -> Self {
        Self::new(Lang::En, Lang::Zh, text)
    }

    /// Chinese to English request
    pub fn zh_to_en(text: impl Into<String>) -> Self {
        Self::new(Lang::Zh, Lang::En, text)
    }

    /// Length as counted against the provider limit
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Translation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    /// Provider request id
    pub request_id: String,
    /// Source language as reported by the provider
    pub source_lang: String,
    /// Target language as reported by the provider
    pub target_lang: String,
    /// Translated text
    pub translated_text: String,
}
