//! Engine abstraction used by the built-in oracle.
//!
//! Defines common search parameters and output payloads so different move
//! choosers can be selected by skill level behind a single trait interface.

use std::time::Duration;

use crate::rules::chess_move::Move;
use crate::rules::position::Position;

#[derive(Debug, Clone, Default)]
pub struct SearchParams {
    pub depth: Option<u8>,
    pub movetime: Option<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    pub best_move: Option<Move>,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn choose_move(
        &mut self,
        position: &Position,
        params: &SearchParams,
    ) -> Result<EngineOutput, String>;
}
