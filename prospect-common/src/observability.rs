//! Centralised `tracing` initialisation.
//!
//! Prospect is a batch CLI, so the primary sink is `stderr`; a rolling daily
//! file sink can be added for long mining runs. Call [`init_tracing`] once
//! near process start — repeated calls are no-ops that return the path of
//! the file sink (if any) resolved by the first caller.

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static RESOLVED: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Options accepted by [`init_tracing`].
#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Directory for the rolling daily file sink. `None` disables the file
    /// sink; `PROSPECT_LOG_DIR` overrides it when set.
    pub log_dir: Option<PathBuf>,
    /// Whether to emit human-readable events to `stderr`.
    pub emit_stderr: bool,
    /// Encoding used by the file sink.
    pub format: LogFormat,
    /// Filter applied when `RUST_LOG` is unset.
    pub default_filter: &'static str,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            log_dir: None,
            emit_stderr: true,
            format: LogFormat::Text,
            default_filter: "info",
        }
    }
}

/// Initialise the global subscriber. Returns the log file path when a file
/// sink was configured.
pub fn init_tracing(opts: LogOptions) -> anyhow::Result<Option<PathBuf>> {
    if let Some(resolved) = RESOLVED.get() {
        return Ok(resolved.clone());
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(opts.default_filter));

    let dir = std::env::var("PROSPECT_LOG_DIR")
        .ok()
        .map(PathBuf::from)
        .or(opts.log_dir);

    let stderr_layer = opts
        .emit_stderr
        .then(|| fmt::layer().with_writer(std::io::stderr));

    let mut file_path = None;
    let file_layer = match dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create log directory: {}", dir.display()))?;
            file_path = Some(dir.join("prospect.log"));
            let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, "prospect.log"));
            let _ = FILE_GUARD.set(guard);
            match opts.format {
                LogFormat::Text => Some(fmt::layer().with_writer(writer).with_ansi(false).boxed()),
                LogFormat::Json => Some(fmt::layer().json().with_writer(writer).boxed()),
            }
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = RESOLVED.set(file_path.clone());
    Ok(file_path)
}
