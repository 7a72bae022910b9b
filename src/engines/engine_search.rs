//! Iterative deepening negamax alpha-beta over material.
//!
//! Depths are searched in order until the depth limit or the time budget is
//! reached; a depth interrupted by the deadline is discarded and the best
//! move of the last completed depth is returned.

use std::time::Instant;

use crate::engines::engine_trait::{Engine, EngineOutput, SearchParams};
use crate::rules::chess_move::{CandidateMove, Move};
use crate::rules::chess_types::PieceKind;
use crate::rules::position::Position;

const MATE_SCORE: i32 = 30000;
const MATE_THRESHOLD: i32 = MATE_SCORE - 256;

pub struct SearchEngine {
    max_depth: u8,
}

impl SearchEngine {
    pub fn new(max_depth: u8) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }
}

struct SearchContext {
    deadline: Option<Instant>,
    nodes: u64,
    aborted: bool,
}

impl SearchContext {
    #[inline]
    fn out_of_time(&mut self) -> bool {
        if !self.aborted && self.deadline.is_some_and(|d| Instant::now() >= d) {
            self.aborted = true;
        }
        self.aborted
    }
}

impl Engine for SearchEngine {
    fn name(&self) -> &str {
        "Search"
    }

    fn choose_move(
        &mut self,
        position: &Position,
        params: &SearchParams,
    ) -> Result<EngineOutput, String> {
        let mut out = EngineOutput::default();
        let mut moves = ordered_moves(position);
        if moves.is_empty() {
            return Ok(out);
        }

        let max_depth = params.depth.unwrap_or(self.max_depth).max(1);
        let mut ctx = SearchContext {
            deadline: params.movetime.map(|t| Instant::now() + t),
            nodes: 0,
            aborted: false,
        };

        let mut best_move = moves[0].mv;
        for depth in 1..=max_depth {
            let Some((mv, score)) = negamax_root(position, &moves, depth, &mut ctx) else {
                break;
            };
            best_move = mv;
            out.info_lines.push(format!(
                "search_engine depth {depth} score {score} nodes {}",
                ctx.nodes
            ));

            // Search the previous best first on the next iteration.
            if let Some(idx) = moves.iter().position(|c| c.mv == mv) {
                moves[..=idx].rotate_right(1);
            }
            if score.abs() >= MATE_THRESHOLD {
                break;
            }
        }

        out.best_move = Some(best_move);
        Ok(out)
    }
}

fn negamax_root(
    position: &Position,
    moves: &[CandidateMove],
    depth: u8,
    ctx: &mut SearchContext,
) -> Option<(Move, i32)> {
    let mut alpha = -MATE_SCORE;
    let beta = MATE_SCORE;
    let mut best: Option<(Move, i32)> = None;

    for candidate in moves {
        let next = position.successor(candidate);
        let score = -negamax(&next, depth - 1, -beta, -alpha, 1, ctx);
        if ctx.aborted {
            return None;
        }
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((candidate.mv, score));
        }
        alpha = alpha.max(score);
    }

    best
}

fn negamax(
    position: &Position,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    ply: i32,
    ctx: &mut SearchContext,
) -> i32 {
    ctx.nodes += 1;
    if ctx.out_of_time() {
        return 0;
    }

    let moves = ordered_moves(position);
    if moves.is_empty() {
        return terminal_score(position, ply);
    }
    if depth == 0 {
        return position.material_balance(position.side_to_move());
    }

    let mut best = -MATE_SCORE;
    for candidate in &moves {
        let next = position.successor(candidate);
        let score = -negamax(&next, depth - 1, -beta, -alpha, ply + 1, ctx);
        if ctx.aborted {
            return 0;
        }
        best = best.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }
    best
}

fn terminal_score(position: &Position, ply: i32) -> i32 {
    if position.is_check() {
        -MATE_SCORE + ply
    } else {
        0
    }
}

/// Captures first, most valuable victim and least valuable attacker first.
fn ordered_moves(position: &Position) -> Vec<CandidateMove> {
    let mut moves = position.legal_moves();
    moves.sort_by_key(|c| {
        let victim = c.captured.map(PieceKind::value).unwrap_or(0);
        let promotion = c.mv.promotion.map(PieceKind::value).unwrap_or(0);
        -(victim * 10 + promotion - c.moved.value() / 100)
    });
    moves
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::SearchEngine;
    use crate::engines::engine_trait::{Engine, SearchParams};
    use crate::rules::position::Position;

    #[test]
    fn finds_mate_in_one() {
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1")
            .expect("fen should parse");
        let out = SearchEngine::new(2)
            .choose_move(&position, &SearchParams::default())
            .expect("search should not fail");
        assert_eq!(
            out.best_move.map(|mv| mv.to_string()),
            Some("a1a8".to_owned())
        );
    }

    #[test]
    fn avoids_hanging_the_queen() {
        // Qd1xd5 loses the queen to the pawn on e6.
        let position = Position::from_fen("4k3/8/4p3/3p4/8/8/8/3QK3 w - - 0 1")
            .expect("fen should parse");
        let out = SearchEngine::new(2)
            .choose_move(&position, &SearchParams::default())
            .expect("search should not fail");
        let mv = out.best_move.expect("a move exists");
        assert_ne!(mv.to_string(), "d1d5");
        assert!(position.is_legal(&mv));
    }

    #[test]
    fn always_answers_within_a_tiny_budget() {
        let position = Position::new_game();
        let params = SearchParams {
            depth: Some(8),
            movetime: Some(Duration::from_millis(1)),
        };
        let out = SearchEngine::new(8)
            .choose_move(&position, &params)
            .expect("search should not fail");
        let mv = out.best_move.expect("a move should be returned");
        assert!(position.is_legal(&mv));
    }
}
