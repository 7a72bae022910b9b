//! Command-line configuration.
//!
//! Every flag that tunes the session can also come from a `PLUM_BOARD_*`
//! environment variable. Values are checked by `validate` before any
//! subsystem starts.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::controller::game_controller::ControllerSettings;
use crate::errors::ConfigError;
use crate::logging::{LogConfig, DEFAULT_LOG_LEVEL};
use crate::oracle::builtin_oracle::{DEFAULT_SKILL, MAX_SKILL, MIN_SKILL};
use crate::rules::position::Position;

pub const DEFAULT_THINK_MS: u64 = 400;
pub const DEFAULT_TICK_MS: u64 = 100;

/// Play chess on a console board against a friend or a bot, with an
/// optional move assistant.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "plum_board", version)]
pub struct Config {
    /// Path to a UCI engine executable. The built-in engine is used when absent.
    #[arg(long, env = "PLUM_BOARD_ENGINE", value_name = "PATH")]
    pub engine: Option<PathBuf>,

    /// Extra command-line argument for the UCI engine (repeatable).
    #[arg(long = "engine-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,

    /// Built-in engine strength, 1 (random) to 10 (deepest search).
    #[arg(long, env = "PLUM_BOARD_SKILL", default_value_t = DEFAULT_SKILL)]
    pub skill: u8,

    /// Time budget for each oracle consultation, in milliseconds.
    #[arg(long = "think-ms", env = "PLUM_BOARD_THINK_MS", default_value_t = DEFAULT_THINK_MS)]
    pub think_ms: u64,

    /// Interval at which background results are polled, in milliseconds.
    #[arg(long = "tick-ms", env = "PLUM_BOARD_TICK_MS", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Start with the bot playing Black.
    #[arg(long)]
    pub bot: bool,

    /// Start with the move assistant on.
    #[arg(long)]
    pub assistant: bool,

    /// Start from this FEN instead of the standard position.
    #[arg(long, value_name = "FEN")]
    pub fen: Option<String>,

    /// Log filter directive, overridden by RUST_LOG.
    #[arg(long = "log-level", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Write logs to this file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Render the board without terminal colors.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SKILL..=MAX_SKILL).contains(&self.skill) {
            return Err(ConfigError::SkillOutOfRange(self.skill));
        }
        if self.think_ms == 0 {
            return Err(ConfigError::ZeroDuration { name: "think-ms" });
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroDuration { name: "tick-ms" });
        }
        if let Some(path) = &self.engine {
            if !path.is_file() {
                return Err(ConfigError::EngineNotFound(path.display().to_string()));
            }
        }
        self.start_position().map(|_| ())
    }

    #[inline]
    pub fn think_time(&self) -> Duration {
        Duration::from_millis(self.think_ms)
    }

    #[inline]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn start_position(&self) -> Result<Position, ConfigError> {
        match &self.fen {
            Some(text) => Position::from_fen(text).map_err(ConfigError::StartPosition),
            None => Ok(Position::new_game()),
        }
    }

    pub fn controller_settings(&self) -> Result<ControllerSettings, ConfigError> {
        Ok(ControllerSettings {
            bot_enabled: self.bot,
            assistant_enabled: self.assistant,
            start_position: self.start_position()?,
        })
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            file: self.log_file.clone(),
        }
    }
}
