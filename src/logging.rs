use crate::config::LogLevel;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE_NAME: &str = "dbscribe.log";

/// Get the path to the log file inside `log_dir`
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

/// Filter directive used when `RUST_LOG` is not set.
///
/// sqlx logs every statement at info, which would drown the flow messages.
fn filter_directive(level: LogLevel, debug: bool) -> String {
    let level = if debug { LogLevel::Debug } else { level };
    format!("{level},sqlx=warn")
}

/// Route `tracing` output to the log file so the terminal stays clean for
/// the REPL. The returned guard must be held until exit to flush the file.
pub fn init(log_dir: &Path, level: LogLevel, debug: bool) -> io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = if debug {
        EnvFilter::new(filter_directive(level, true))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(filter_directive(level, false)))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .finish()
        .try_init()
        .map_err(io::Error::other)?;

    tracing::info!("Logging initialized at {}", log_file_path(log_dir).display());
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(LogLevel::Info, false, "info,sqlx=warn")]
    #[case(LogLevel::Error, false, "error,sqlx=warn")]
    #[case(LogLevel::Warn, true, "debug,sqlx=warn")]
    fn test_filter_directive(#[case] level: LogLevel, #[case] debug: bool, #[case] expected: &str) {
        assert_eq!(filter_directive(level, debug), expected);
    }

    #[rstest]
    fn test_init_writes_to_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let log_dir = dir.path().join("logs");

        let guard = init(&log_dir, LogLevel::Info, false);

        assert!(guard.is_ok());
        assert!(log_dir.exists());
    }
}
