use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::analyze::UrlAnalyzer;
use crate::error::AnalysisError;
use crate::models::AnalysisRequest;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<UrlAnalyzer>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/urlanalyzer/analyze", post(analyze_endpoint))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn analyze_endpoint(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> Response {
    let url = match req.validate() {
        Ok(url) => url,
        Err(e) => {
            let detail = match e {
                AnalysisError::InvalidInput(msg) => msg,
                other => other.to_string(),
            };
            tracing::warn!(url = ?req.url, "rejected analysis request: {}", detail);
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": detail }))).into_response();
        }
    };

    tracing::info!("received analysis request for URL: {}", url);

    // Dropped with this future when the client goes away, which cancels the
    // in-flight fetch.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let result = state.analyzer.analyze(&url, &cancel).await;
    let status = if result.is_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    (status, Json(result)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::Value;

    use crate::analyze::{AnalyzerOptions, GENERIC_ERROR};
    use crate::fetch::tests::spawn_fixture_server;
    use crate::fetch::Fetcher;

    fn state() -> AppState {
        AppState {
            analyzer: Arc::new(UrlAnalyzer::new(
                Fetcher::new(Duration::from_secs(5), false).unwrap(),
                AnalyzerOptions::default(),
            )),
        }
    }

    async fn call(url: Option<&str>) -> (StatusCode, Value) {
        let req = AnalysisRequest {
            url: url.map(str::to_string),
        };
        let response = analyze_endpoint(State(state()), Json(req)).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn successful_analysis_is_ok() {
        let base = spawn_fixture_server().await;
        let (status, body) = call(Some(base.join("page").unwrap().as_str())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalWordCount"], 4);
        assert_eq!(body["topWords"][0], json!({"word": "hello", "count": 2}));
        assert_eq!(body["images"][0]["altText"], "A");
        assert_eq!(body["error"], Value::Null);
    }

    #[tokio::test]
    async fn failed_analysis_is_bad_request_with_result_body() {
        let base = spawn_fixture_server().await;
        let (status, body) = call(Some(base.join("missing").unwrap().as_str())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"images": [], "totalWordCount": 0, "topWords": [], "error": GENERIC_ERROR})
        );
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_analysis() {
        let (status, body) = call(None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "The Url field is required.");

        let (status, body) = call(Some("example.com/page")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("not a valid"));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
