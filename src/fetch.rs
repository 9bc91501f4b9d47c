use std::time::Duration;

use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::USER_AGENT;
use crate::error::FetchError;

pub struct FetchedDocument {
    pub body: String,
    /// URL after any redirects the transport followed; used as the base for
    /// relative references.
    pub final_url: Url,
}

/// Owns the pooled HTTP client shared by all analyses.
#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new(timeout: Duration, insecure: bool) -> Result<Self, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );

        let mut builder = reqwest::ClientBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers);

        if insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self { client })
    }

    /// Single GET with no retries. Non-2xx is a failure. Cancelling `cancel`
    /// drops the in-flight request and yields [`FetchError::Cancelled`].
    pub async fn fetch(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<FetchedDocument, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = self.fetch_inner(url) => result,
        }
    }

    async fn fetch_inner(&self, url: &Url) -> Result<FetchedDocument, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;

        let final_url = response.url().clone();
        let body = response.text().await?;
        tracing::debug!(url = %final_url, bytes = body.len(), "fetched document");

        Ok(FetchedDocument { body, final_url })
    }
}
