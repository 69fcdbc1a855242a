use std::path::PathBuf;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

static INIT: Once = Once::new();

/// Logging configuration options
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level, unless `RUST_LOG` says otherwise
    pub level: Level,
    /// Whether to include source code locations
    pub source_location: bool,
    /// Whether to log span close events with their timings
    pub log_spans: bool,
    /// Output file path (None for stdout)
    pub file_path: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            source_location: false,
            log_spans: false,
            file_path: None,
        }
    }
}

/// Initialize logging system.
///
/// Only the first call in a process installs a subscriber; later calls are no-ops.
pub fn setup_logging(config: LogConfig) -> Result<(), String> {
    let mut result = Ok(());

    INIT.call_once(|| {
        result = setup_logging_internal(config);
    });

    result
}

fn setup_logging_internal(config: LogConfig) -> Result<(), String> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_span_events(if config.log_spans {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    if let Some(path) = config.file_path {
        use std::fs::OpenOptions;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        builder
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .try_init()
            .map_err(|e| format!("Failed to set global subscriber: {}", e))
    } else {
        builder
            .try_init()
            .map_err(|e| format!("Failed to set global subscriber: {}", e))
    }
}
