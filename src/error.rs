// ── Fetch errors ─────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("TimeoutError: {0}")]
    Timeout(String),
    #[error("ConnectError: {0}")]
    Connect(String),
    #[error("RequestError: {0}")]
    Request(String),
    #[error("failed to read response body: {0}")]
    Body(String),
    #[error("request was cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

// ── Pipeline errors ──────────────────────────────────────────────────────────

/// Any failure inside the analysis pipeline. Never shown to end users; the
/// orchestrator logs it and replaces it with [`crate::analyze::GENERIC_ERROR`].
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("parse failed: {0}")]
    Parse(String),
    #[error("extraction failed: {0}")]
    Extraction(String),
}
