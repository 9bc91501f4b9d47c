use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::document::Document;
use crate::error::{AnalysisError, FetchError};
use crate::fetch::Fetcher;
use crate::images::extract_images;
use crate::models::AnalysisResult;
use crate::rank::{rank, RankOptions};
use crate::text::{collect_fragments, NestedMatches};

pub const GENERIC_ERROR: &str =
    "Failed to analyze URL. Please ensure the URL is valid and accessible.";

/// Read-only settings shared by every analysis.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerOptions {
    pub nested: NestedMatches,
    pub rank: RankOptions,
}

pub struct UrlAnalyzer {
    fetcher: Fetcher,
    options: AnalyzerOptions,
}

impl UrlAnalyzer {
    pub fn new(fetcher: Fetcher, options: AnalyzerOptions) -> Self {
        Self { fetcher, options }
    }

    /// Fetches `url` and analyzes it. Never fails: any error is logged and
    /// reported through [`AnalysisResult::error`] with a fixed message.
    pub async fn analyze(&self, url: &str, cancel: &CancellationToken) -> AnalysisResult {
        tracing::info!("starting analysis of URL: {}", url);

        match self.try_analyze(url, cancel).await {
            Ok(result) => {
                tracing::info!(
                    images = result.images.len(),
                    words = result.total_word_count,
                    "successfully analyzed URL: {}",
                    url
                );
                result
            }
            Err(e) => {
                tracing::error!(error = %e, "error analyzing URL: {}", url);
                AnalysisResult::failed(GENERIC_ERROR)
            }
        }
    }

    async fn try_analyze(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<AnalysisResult, AnalysisError> {
        let target = Url::parse(url).map_err(|e| AnalysisError::InvalidInput(e.to_string()))?;

        tracing::debug!("fetching");
        let fetched = self.fetcher.fetch(&target, cancel).await?;
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled.into());
        }

        analyze_html(&fetched.body, &fetched.final_url, &self.options)
    }
}

/// Runs the in-memory stages over an already fetched body. A panic in any
/// stage is turned into the matching error instead of unwinding further.
pub fn analyze_html(
    body: &str,
    base: &Url,
    options: &AnalyzerOptions,
) -> Result<AnalysisResult, AnalysisError> {
    tracing::debug!("parsing");
    let document = catch_unwind(AssertUnwindSafe(|| Document::parse(body)))
        .map_err(|p| AnalysisError::Parse(panic_message(p)))?;

    tracing::debug!("extracting");
    let (images, fragments) = catch_unwind(AssertUnwindSafe(|| {
        (
            extract_images(&document, base),
            collect_fragments(&document, options.nested),
        )
    }))
    .map_err(|p| AnalysisError::Extraction(panic_message(p)))?;

    tracing::debug!(fragments = fragments.len(), "ranking");
    let ranking = catch_unwind(AssertUnwindSafe(|| rank(&fragments, &options.rank)))
        .map_err(|p| AnalysisError::Extraction(panic_message(p)))?;

    Ok(AnalysisResult {
        images,
        total_word_count: ranking.total,
        top_words: ranking.top,
        error: None,
    })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
