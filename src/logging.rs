use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
    Layer,
    Registry,
};

use crate::error::{CleanError, CleanResult};

/// Logging configuration for the stock cleaner
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub log_dir: PathBuf,
    pub enable_file_logging: bool,
    pub enable_json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            enable_file_logging: false,
            enable_json_format: false,
        }
    }
}

/// Keeps the non-blocking file writer alive; drop it only at process exit
#[derive(Default)]
pub struct LoggingGuard {
    #[cfg(feature = "advanced_logging")]
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Initialize the logging system. Console output goes to stderr so stdout
/// stays reserved for the run summary and preview.
pub fn init_logging(config: &LoggingConfig) -> CleanResult<LoggingGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "stock_cleaner={},polars=warn,{}",
            config.level, config.level
        ))
    });

    let console_layer = if config.enable_json_format {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .compact()
            .boxed()
    };

    let registry = Registry::default().with(env_filter).with(console_layer);

    #[cfg(feature = "advanced_logging")]
    {
        if config.enable_file_logging {
            use tracing_appender::{non_blocking, rolling};

            std::fs::create_dir_all(&config.log_dir).map_err(|e| {
                CleanError::configuration(format!(
                    "cannot create log directory {}: {}",
                    config.log_dir.display(),
                    e
                ))
            })?;

            let file_appender = rolling::daily(&config.log_dir, "stock_cleaner.log");
            let (file_writer, guard) = non_blocking(file_appender);
            let file_layer = fmt::layer().with_writer(file_writer).with_ansi(false);

            registry
                .with(file_layer)
                .try_init()
                .map_err(|e| CleanError::configuration(format!("logging already initialized: {}", e)))?;

            tracing::info!("File logging enabled: {}", config.log_dir.display());
            return Ok(LoggingGuard {
                _file_guard: Some(guard),
            });
        }
    }

    registry
        .try_init()
        .map_err(|e| CleanError::configuration(format!("logging already initialized: {}", e)))?;

    #[cfg(not(feature = "advanced_logging"))]
    {
        if config.enable_file_logging {
            tracing::warn!(
                "File logging to {} requested, but this build lacks the `advanced_logging` feature",
                config.log_dir.display()
            );
        }
    }

    debug!("Log level: {}", config.level);
    Ok(LoggingGuard::default())
}

/// Performance logging utilities
pub struct PerformanceTimer {
    start: std::time::Instant,
    operation: String,
}

impl PerformanceTimer {
    pub fn start(operation: impl Into<String>) -> Self {
        let operation = operation.into();
        debug!("⏱️  Starting: {}", operation);
        Self {
            start: std::time::Instant::now(),
            operation,
        }
    }

    pub fn checkpoint(&self, checkpoint: &str) {
        let elapsed = self.start.elapsed();
        debug!("⏱️  {} - {}: {}ms", self.operation, checkpoint, elapsed.as_millis());
    }
}

impl Drop for PerformanceTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        debug!("⏱️  Completed {}: {}ms", self.operation, elapsed.as_millis());
    }
}

/// Macro for logging a [`CleanError`](crate::error::CleanError) with context
#[macro_export]
macro_rules! log_error {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            not_found = $error.is_not_found(),
            "stock cleaner error occurred"
        );
    };
}
