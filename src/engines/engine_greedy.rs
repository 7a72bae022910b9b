//! Skill-2 engine: take the most valuable capture available, otherwise any
//! move. Ties are broken at random.

use rand::prelude::IndexedRandom;

use crate::engines::engine_trait::{Engine, EngineOutput, SearchParams};
use crate::rules::chess_move::{CandidateMove, Move};
use crate::rules::chess_types::PieceKind;
use crate::rules::position::Position;

#[derive(Debug, Default)]
pub struct GreedyEngine;

impl GreedyEngine {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn gain(candidate: &CandidateMove) -> i32 {
        let capture = candidate.captured.map(PieceKind::value).unwrap_or(0);
        let promotion = candidate
            .mv
            .promotion
            .map(|kind| kind.value() - PieceKind::Pawn.value())
            .unwrap_or(0);
        capture + promotion
    }
}

impl Engine for GreedyEngine {
    fn name(&self) -> &str {
        "Greedy"
    }

    fn choose_move(
        &mut self,
        position: &Position,
        _params: &SearchParams,
    ) -> Result<EngineOutput, String> {
        let legal_moves = position.legal_moves();

        let mut out = EngineOutput::default();
        out.info_lines
            .push(format!("greedy_engine legal_moves {}", legal_moves.len()));

        if legal_moves.is_empty() {
            return Ok(out);
        }

        let mut best_value = i32::MIN;
        let mut best_moves = Vec::<Move>::new();

        for candidate in &legal_moves {
            let value = Self::gain(candidate);
            if value > best_value {
                best_value = value;
                best_moves.clear();
                best_moves.push(candidate.mv);
            } else if value == best_value {
                best_moves.push(candidate.mv);
            }
        }

        let mut rng = rand::rng();
        let picked = best_moves
            .as_slice()
            .choose(&mut rng)
            .ok_or("failed to choose greedy best move")?;

        out.info_lines
            .push(format!("greedy_engine capture_score {best_value}"));
        out.best_move = Some(*picked);
        Ok(out)
    }
}
