use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the non-blocking writer guards alive; dropping the logger flushes
/// and stops the background writers.
pub struct Logger {
    pub guards: Vec<WorkerGuard>,
}

impl Logger {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let guards = Self::setup_logging()?;
        Ok(Logger { guards })
    }

    /// Console (pretty) + daily rolling files: general and error-only, each in
    /// plain text and JSON.
    ///
    /// - `RUST_LOG`: console filter (default `debug,leadflow_backend=debug`)
    /// - `FILE_LOG_LEVEL`: general file filter (default `debug`)
    /// - `ERROR_FILE_LOG_LEVEL`: error file filter (default `error`)
    /// - `LOG_DIR`: base directory (default `logs`)
    pub fn setup_logging() -> Result<Vec<WorkerGuard>, Box<dyn std::error::Error>> {
        let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
        std::fs::create_dir_all(&log_dir)?;

        let console_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("debug,leadflow_backend=debug"));
        let file_level = std::env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());
        let error_level = std::env::var("ERROR_FILE_LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        let mut guards = Vec::new();
        let mut layers: Vec<BoxedLayer> = vec![fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(true)
            .with_ansi(true)
            .with_filter(console_filter)
            .boxed()];

        let targets = [
            (log_dir.clone(), "leadflow-backend.log", file_level.as_str(), false),
            (format!("{}/error", log_dir), "leadflow-backend-error.log", error_level.as_str(), false),
            (format!("{}/json", log_dir), "leadflow-backend.json", file_level.as_str(), true),
            (format!("{}/error/json", log_dir), "leadflow-backend-error.json", error_level.as_str(), true),
        ];
        for (dir, file, level, json) in targets {
            let (writer, guard) = non_blocking(rolling::daily(dir, file));
            guards.push(guard);
            layers.push(file_layer(writer, level, json));
        }

        tracing_subscriber::registry().with(layers).try_init()?;
        Ok(guards)
    }
}

fn file_layer(writer: NonBlocking, level: &str, json: bool) -> BoxedLayer {
    let base = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);
    if json {
        base.json().with_filter(EnvFilter::new(level)).boxed()
    } else {
        base.with_filter(EnvFilter::new(level)).boxed()
    }
}
