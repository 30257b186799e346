use dirs::home_dir;
use std::{env, fs, path::Path, path::PathBuf, sync::Once};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".finmate_core";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("finmate_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Returns the application-specific data directory, defaulting to `~/.finmate_core`.
///
/// The `FINMATE_HOME` environment variable overrides the default, which keeps
/// tests and multiple sessions from sharing a model artifact.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("FINMATE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Creates the directory (and parents) when missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
