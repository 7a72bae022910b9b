//! Error types used throughout the crate.
//!
//! Rule and oracle errors are recoverable: the controller turns them into
//! user notices or log lines and keeps running. Only `StartupError` ends the
//! session, and only before the interactive loop has begun.

use std::time::Duration;

use thiserror::Error;

use crate::rules::chess_move::Move;

/// Failures reported by the rules adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    /// FEN text could not be parsed or describes an impossible position.
    #[error("invalid position format: {0}")]
    InvalidPositionFormat(String),
    /// The move is not legal in the position it was applied to.
    #[error("illegal move {0}")]
    IllegalMove(Move),
    /// A null move could not be applied.
    #[error("cannot pass the turn: {0}")]
    PassRejected(String),
}

/// Failures of a single oracle consultation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    #[error("oracle timed out after {0:?}")]
    Timeout(Duration),
    #[error("oracle protocol error: {0}")]
    Protocol(String),
    #[error("oracle returned no move")]
    NoMove,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("skill level must be within 1..=10, got {0}")]
    SkillOutOfRange(u8),
    #[error("{name} must be greater than zero")]
    ZeroDuration { name: &'static str },
    #[error("engine executable not found: {0}")]
    EngineNotFound(String),
    #[error("starting position rejected: {0}")]
    StartPosition(RulesError),
}

/// Conditions that abort the session before the interactive loop starts.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not establish the move oracle: {0}")]
    Oracle(#[from] OracleError),
    #[error("could not install logging: {0}")]
    Logging(String),
    #[error("console i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
