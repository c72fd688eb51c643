//! Logging setup
//!
//! The terminal belongs to the UI, so log output goes to a file that is
//! truncated on every run. Verbosity follows `RUST_LOG` (default `info`).

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::Result;

/// Default log location: `advocates.log` in the system temp directory
pub fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("advocates.log")
}

/// Install the global subscriber writing to `path`. A second call is a no-op.
pub fn init(path: &Path) -> Result<()> {
    // Opening truncates, so never touch the file a live subscriber writes to
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        eprintln!("[advocates] Logging to: {}", path.display());
    }

    Ok(())
}
