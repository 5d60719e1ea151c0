//! Shared `log4rs` bootstrap for every worker binary (spec.md §6 "Log
//! files"), generalizing the reference app's `setup()` routine: a
//! console appender plus a file appender, both using the same
//! `PatternEncoder`, with the level read from `RUST_LOG` and defaulting
//! to `Info`.

use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const PATTERN: &str = "{d} | {l} | {f}:{L} - {m}{n}";

/// `<system temp dir>/ascendara_<worker>_<YYYYMMDD_HHMMSS>.log`, per
/// spec.md §6.
pub fn log_file_path(worker: &str) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    std::env::temp_dir().join(format!("ascendara_{worker}_{timestamp}.log"))
}

/// Initializes the process-wide logger. Panics on failure since a worker
/// with no working log sink has no way to report why it couldn't start.
pub fn init(worker: &str) {
    let log_path = log_file_path(worker);

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .append(false)
        .build(&log_path)
        .expect("failed to create worker log file");

    let console_appender = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();

    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "Info".to_string());

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .appender(Appender::builder().build("console", Box::new(console_appender)))
        .build(
            Root::builder()
                .appenders(["file", "console"])
                .build(LevelFilter::from_str(&level).unwrap_or(LevelFilter::Info)),
        )
        .expect("failed to build log4rs config");

    log4rs::init_config(config).expect("failed to initialize log4rs");
    log::info!("{worker} logging to {}", log_path.display());
}
