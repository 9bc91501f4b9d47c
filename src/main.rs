use std::sync::Arc;

mod analyze;
mod api;
mod config;
mod document;
mod error;
mod fetch;
mod images;
mod logging;
mod models;
mod rank;
mod text;

use analyze::{AnalyzerOptions, UrlAnalyzer};
use config::Config;
use fetch::Fetcher;
use rank::RankOptions;
use text::NestedMatches;

#[tokio::main]
async fn main() {
    let config = Config::from_env();
    let _log_guard = logging::init_logging(&config.log_dir);
    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }

    if let Err(e) = run(config).await {
        tracing::error!("application terminated unexpectedly: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    if config.insecure_ssl {
        tracing::warn!("TLS certificate verification is disabled");
    }

    let fetcher = Fetcher::new(config.fetch_timeout, config.insecure_ssl)?;
    let mut options = AnalyzerOptions::default();
    if config.stop_words {
        options.rank = RankOptions::default().with_default_stop_words();
    }
    if config.outermost_only {
        options.nested = NestedMatches::OutermostOnly;
    }
    tracing::debug!(?options, "analyzer options");

    let analyzer = UrlAnalyzer::new(fetcher, options);
    let app = api::router(api::AppState {
        analyzer: Arc::new(analyzer),
    });

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
