use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{ChatbookError, Result};

/// Environment variable holding the log filter directive
pub const LOG_ENV: &str = "CHATBOOK_LOG";

/// `chatbook.log` under the platform data directory
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("chatbook").join("chatbook.log"))
}

/// Filter from `CHATBOOK_LOG`, or `debug` for our crates when unset
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("chatbook=debug,chatbook_common=debug"))
}

/// Route tracing output to a file. The terminal belongs to the TUI, so
/// nothing is ever written to stdout or stderr.
///
/// Logging is off unless `log_file` is given or `CHATBOOK_LOG` is set.
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None if std::env::var_os(LOG_ENV).is_some() => default_log_path().ok_or_else(|| {
            ChatbookError::Telemetry("could not find data directory".to_string())
        })?,
        None => return Ok(()),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ChatbookError::Telemetry(e.to_string()))?;

    tracing::info!(path = %path.display(), "logging initialised");
    Ok(())
}
