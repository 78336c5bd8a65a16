use std::io;
use std::path::Path;
use std::sync::OnceLock;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{ fmt, prelude::*, EnvFilter, filter::LevelFilter };
use tracing_appender::rolling::{ RollingFileAppender, Rotation };
use tracing_appender::non_blocking::WorkerGuard;

use crate::config::{ LogConfig, LogRotation };

// Store both guards to keep the writer threads alive
struct LogGuards {
    _file_guard: WorkerGuard,
    _console_guard: WorkerGuard,
}

static LOG_GUARDS: OnceLock<LogGuards> = OnceLock::new();

/// Initialize logging: a non-blocking rolling file plus console output.
/// Debug mode switches the console to the pretty, span-aware format.
pub fn init_logging(level: Level, debug: bool, log_config: &LogConfig) -> io::Result<()> {
    // Create log directory if it doesn't exist
    if !log_config.directory.exists() {
        std::fs::create_dir_all(&log_config.directory).map_err(|e| {
            eprintln!("Failed to create log directory: {}", e);
            e
        })?;
    }

    let filename = format!("{}.log", log_config.filename_prefix);

    // Convert rotation enum to tracing_appender rotation
    let rotation = match log_config.rotation {
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Never => Rotation::NEVER,
    };

    let file_appender = RollingFileAppender::new(rotation, log_config.directory.clone(), filename);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt
        ::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE);

    let (console_writer, console_guard) = tracing_appender::non_blocking(io::stdout());

    let filter = EnvFilter::from_default_env().add_directive(LevelFilter::from_level(level).into());

    if debug {
        let console_layer = fmt
            ::layer()
            .with_writer(console_writer)
            .with_ansi(true)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .pretty();

        tracing_subscriber::registry().with(filter).with(file_layer).with(console_layer).init();
    } else {
        let console_layer = fmt
            ::layer()
            .with_writer(console_writer)
            .with_ansi(true)
            .with_target(false)
            .compact();

        tracing_subscriber::registry().with(filter).with(file_layer).with(console_layer).init();
    }

    let _ = LOG_GUARDS.set(LogGuards {
        _file_guard: file_guard,
        _console_guard: console_guard,
    });

    // Clean up old log files if max_files is specified
    if let Some(max_files) = log_config.max_files {
        if
            let Err(e) = cleanup_old_logs(
                &log_config.directory,
                &log_config.filename_prefix,
                max_files
            )
        {
            // Don't fail initialization if cleanup fails, just log the error
            eprintln!("Failed to clean up old log files: {}", e);
        }
    }

    tracing::info!(
        log_dir = %log_config.directory.display(),
        log_prefix = %log_config.filename_prefix,
        "Logging initialized at level: {:?}",
        level
    );

    Ok(())
}

/// Clean up old log files to keep only the most recent ones
fn cleanup_old_logs(log_dir: &Path, prefix: &str, max_files: usize) -> io::Result<()> {
    let mut entries = std::fs
        ::read_dir(log_dir)?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();

            // Only consider files with the correct prefix
            if path.is_file() && path.file_name()?.to_string_lossy().starts_with(prefix) {
                let modified = entry.metadata().ok()?.modified().ok()?;
                return Some((path, modified));
            }
            None
        })
        .collect::<Vec<_>>();

    if entries.len() > max_files {
        // Newest first
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        for (path, _) in entries.iter().skip(max_files) {
            std::fs::remove_file(path)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleanup_keeps_newest_files() {
        let dir = std::env::temp_dir().join(format!("tri_logs_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        for i in 0..4 {
            std::fs::write(dir.join(format!("scanner.log.{}", i)), "x").unwrap();
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        std::fs::write(dir.join("other.log"), "x").unwrap();

        cleanup_old_logs(&dir, "scanner", 2).unwrap();

        let mut remaining: Vec<String> = std::fs
            ::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        remaining.sort();
        assert_eq!(remaining, vec!["other.log", "scanner.log.2", "scanner.log.3"]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
