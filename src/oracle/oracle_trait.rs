//! Move oracle abstraction.
//!
//! An oracle answers one question: given a position snapshot and a time
//! budget, which move would it play? Implementations may block for up to the
//! budget (plus their own overhead); callers run them off the interactive
//! thread.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::errors::OracleError;
use crate::oracle::builtin_oracle::BuiltinOracle;
use crate::oracle::uci_oracle::UciOracle;
use crate::rules::chess_move::Move;
use crate::rules::position::Position;

pub trait Oracle: Send + Sync {
    fn name(&self) -> &str;

    fn best_move(&self, snapshot: &Position, budget: Duration) -> Result<Move, OracleError>;
}

/// Build the oracle for this session: an external UCI engine when a path is
/// given, otherwise the built-in engine at `skill`. Failure here is fatal to
/// the session.
pub fn establish_oracle(
    engine_path: Option<&Path>,
    engine_args: &[String],
    skill: u8,
) -> Result<Arc<dyn Oracle>, OracleError> {
    let oracle: Arc<dyn Oracle> = match engine_path {
        Some(path) => Arc::new(UciOracle::establish_with_args(path, engine_args.to_vec())?),
        None => Arc::new(BuiltinOracle::new(skill)),
    };
    info!(oracle = oracle.name(), "move oracle established");
    Ok(oracle)
}
