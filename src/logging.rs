//! Diagnostic logging setup.
//!
//! Logs go to stderr by default, or to an append-only file so the console
//! board is not interleaved with log lines. `RUST_LOG` overrides the
//! configured level when set.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::errors::StartupError;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// An `EnvFilter` directive such as `info` or `plum_board=debug`.
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_owned(),
            file: None,
        }
    }
}

/// Install the global subscriber. A second call reports an error instead of
/// replacing the subscriber already installed.
pub fn init(config: &LogConfig) -> Result<(), StartupError> {
    let filter = build_filter(config)?;

    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(io::stderr)
            .try_init(),
    };

    installed.map_err(|e| StartupError::Logging(e.to_string()))
}

fn build_filter(config: &LogConfig) -> Result<EnvFilter, StartupError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| StartupError::Logging(format!("invalid log level '{}': {e}", config.level)))
}

#[cfg(test)]
mod tests {
    use super::{build_filter, LogConfig};

    #[test]
    fn default_level_is_warn() {
        assert_eq!(LogConfig::default().level, "warn");
    }

    #[test]
    fn directive_levels_build_a_filter() {
        let config = LogConfig {
            level: "plum_board=debug,info".to_owned(),
            file: None,
        };
        assert!(build_filter(&config).is_ok());
    }
}
