//! In-process oracle backed by the engines in `crate::engines`.
//!
//! A fresh engine is built per consultation, so concurrent play and suggest
//! requests never share search state.

use std::time::Duration;

use tracing::trace;

use crate::engines::engine_greedy::GreedyEngine;
use crate::engines::engine_random::RandomEngine;
use crate::engines::engine_search::SearchEngine;
use crate::engines::engine_trait::{Engine, SearchParams};
use crate::errors::OracleError;
use crate::oracle::oracle_trait::Oracle;
use crate::rules::chess_move::Move;
use crate::rules::position::Position;

pub const MIN_SKILL: u8 = 1;
pub const MAX_SKILL: u8 = 10;
pub const DEFAULT_SKILL: u8 = 5;

pub struct BuiltinOracle {
    skill: u8,
    name: String,
}

impl BuiltinOracle {
    pub fn new(skill: u8) -> Self {
        let skill = skill.clamp(MIN_SKILL, MAX_SKILL);
        let name = format!("builtin {} (skill {skill})", build_engine(skill).name());
        Self { skill, name }
    }

    #[inline]
    pub fn skill(&self) -> u8 {
        self.skill
    }
}

impl Oracle for BuiltinOracle {
    fn name(&self) -> &str {
        &self.name
    }

    fn best_move(&self, snapshot: &Position, budget: Duration) -> Result<Move, OracleError> {
        let mut engine = build_engine(self.skill);
        let params = SearchParams {
            depth: None,
            movetime: Some(budget),
        };
        let out = engine
            .choose_move(snapshot, &params)
            .map_err(OracleError::Protocol)?;
        for line in &out.info_lines {
            trace!(oracle = %self.name, "{line}");
        }
        out.best_move.ok_or(OracleError::NoMove)
    }
}

fn build_engine(skill: u8) -> Box<dyn Engine> {
    match skill {
        1 => Box::new(RandomEngine::new()),
        2 => Box::new(GreedyEngine::new()),
        3 | 4 => Box::new(SearchEngine::new(2)),
        5 | 6 => Box::new(SearchEngine::new(3)),
        7 | 8 => Box::new(SearchEngine::new(4)),
        9 => Box::new(SearchEngine::new(5)),
        _ => Box::new(SearchEngine::new(6)),
    }
}
