use std::path::PathBuf;
use std::time::Duration;

pub const USER_AGENT: &str = "UrlAnalyzer/1.0";

const DEFAULT_BIND: &str = "0.0.0.0:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_DIR: &str = "Logs";

/// Process configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub fetch_timeout: Duration,
    pub log_dir: PathBuf,
    pub insecure_ssl: bool,
    pub stop_words: bool,
    /// Count only the outermost of nested content elements.
    pub outermost_only: bool,
    /// Problems found while reading the environment. Reported after logging
    /// is initialized, since the logger itself depends on this config.
    pub warnings: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            insecure_ssl: false,
            stop_words: false,
            outermost_only: false,
            warnings: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(bind) = lookup("URL_ANALYZER_BIND").filter(|s| !s.trim().is_empty()) {
            config.bind = bind.trim().to_string();
        }

        if let Some(raw) = lookup("URL_ANALYZER_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.fetch_timeout = Duration::from_secs(secs),
                _ => config.warnings.push(format!(
                    "ignoring URL_ANALYZER_TIMEOUT_SECS={:?}, using {}s",
                    raw, DEFAULT_TIMEOUT_SECS
                )),
            }
        }

        if let Some(dir) = lookup("URL_ANALYZER_LOG_DIR").filter(|s| !s.trim().is_empty()) {
            config.log_dir = PathBuf::from(dir);
        }

        config.insecure_ssl = lookup("URL_ANALYZER_INSECURE_SSL").as_deref() == Some("1");
        config.stop_words = lookup("URL_ANALYZER_STOP_WORDS").as_deref() == Some("1");

        if let Some(raw) = lookup("URL_ANALYZER_NESTED") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "count" => config.outermost_only = false,
                "outermost" => config.outermost_only = true,
                _ => config.warnings.push(format!(
                    "ignoring URL_ANALYZER_NESTED={:?}, expected \"count\" or \"outermost\"",
                    raw
                )),
            }
        }
        config
    }
}
