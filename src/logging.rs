//! Logging init: console plus a daily rolling file under the configured log
//! directory, falling back to console only when the file can't be opened.

use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_PREFIX: &str = "urlanalyzer";
const LOG_FILE_SUFFIX: &str = "log";
const RETAINED_LOG_FILES: usize = 7;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The returned guard flushes buffered file output on drop; keep it alive
/// for the life of the process.
pub fn init_logging(log_dir: &Path) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard, file_err) = match file_appender(log_dir) {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    match file_err {
        None => tracing::info!(
            "logging to {}/{}.<date>.{}",
            log_dir.display(),
            LOG_FILE_PREFIX,
            LOG_FILE_SUFFIX
        ),
        Some(e) => tracing::warn!(
            "could not open log file in {}: {}; logging to console only",
            log_dir.display(),
            e
        ),
    }
    guard
}

/// Rolls over daily and keeps the newest [`RETAINED_LOG_FILES`] files.
fn file_appender(log_dir: &Path) -> Result<RollingFileAppender, BoxError> {
    fs::create_dir_all(log_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(RETAINED_LOG_FILES)
        .build(log_dir)?;
    Ok(appender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn writes_dated_file_under_log_dir() {
        let dir = std::env::temp_dir().join(format!("url-analyzer-log-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let mut appender = file_appender(&dir).unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();

        let names: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1, "{:?}", names);
        let name = &names[0];
        assert!(name.starts_with("urlanalyzer."), "{}", name);
        assert!(name.ends_with(".log"), "{}", name);
        assert_eq!(fs::read_to_string(dir.join(name)).unwrap(), "hello\n");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn fails_when_directory_is_a_file() {
        let blocker = std::env::temp_dir().join(format!("url-analyzer-blocker-{}", std::process::id()));
        fs::write(&blocker, b"x").unwrap();

        assert!(file_appender(&blocker).is_err());

        fs::remove_file(&blocker).unwrap();
    }
}
