use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AnalysisError;

const URL_REQUIRED: &str = "The Url field is required.";
const URL_INVALID: &str = "The Url field is not a valid fully-qualified http, https, or ftp URL.";

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub url: Option<String>,
}

impl AnalysisRequest {
    /// Returns the trimmed URL if it is present and absolute http(s)/ftp.
    pub fn validate(&self) -> Result<String, AnalysisError> {
        let raw = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AnalysisError::InvalidInput(URL_REQUIRED.to_string()))?;

        let parsed =
            Url::parse(raw).map_err(|_| AnalysisError::InvalidInput(URL_INVALID.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https" | "ftp") || !parsed.has_host() {
            return Err(AnalysisError::InvalidInput(URL_INVALID.to_string()));
        }
        Ok(raw.to_string())
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    pub url: String,
    pub alt_text: String,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct WordFrequencyRecord {
    pub word: String,
    pub count: usize,
}

/// Outcome of one analysis. When `error` is set the other fields are empty
/// and must not be read as an empty analysis.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub images: Vec<ImageRecord>,
    pub total_word_count: usize,
    pub top_words: Vec<WordFrequencyRecord>,
    pub error: Option<String>,
}

impl AnalysisResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
