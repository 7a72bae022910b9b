//! Skill-1 random-move engine.
//!
//! Selects uniformly from legal moves; useful for diagnostics and
//! low-strength play.

use rand::prelude::IndexedRandom;

use crate::engines::engine_trait::{Engine, EngineOutput, SearchParams};
use crate::rules::position::Position;

#[derive(Debug, Default)]
pub struct RandomEngine;

impl RandomEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        "Random"
    }

    fn choose_move(
        &mut self,
        position: &Position,
        params: &SearchParams,
    ) -> Result<EngineOutput, String> {
        let legal_moves = position.legal_moves();

        let mut out = EngineOutput::default();
        out.info_lines
            .push(format!("random_engine legal_moves {}", legal_moves.len()));

        if let Some(depth) = params.depth {
            out.info_lines
                .push(format!("random_engine requested_depth {depth}"));
        }

        if legal_moves.is_empty() {
            return Ok(out);
        }

        let mut rng = rand::rng();
        let picked = legal_moves
            .as_slice()
            .choose(&mut rng)
            .ok_or("failed to choose a random move")?;

        out.best_move = Some(picked.mv);
        Ok(out)
    }
}
