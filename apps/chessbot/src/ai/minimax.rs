//! Minimax: fixed-depth alpha-beta search with a material evaluation.
//!
//! Deterministic: among equally scored moves the first in generation order
//! wins. `depth` counts the plies searched below the root move, so depth 2
//! looks three plies ahead.

use shakmaty::{Chess, Color, Move, Position, Role, Square};

use super::trait_def::{AiError, SearchStrategy};
use crate::engine::ChessEngine;

const MATE_SCORE: i32 = 1_000_000;

#[derive(Clone, Default)]
pub struct Minimax;

impl Minimax {
    pub const NAME: &'static str = "minimax";

    pub fn new() -> Self {
        Self
    }

    /// Best move for the side to move, or `None` if it has no legal move.
    pub fn best_move(position: &Chess, depth: u8) -> Option<Move> {
        let mut best: Option<(i32, Move)> = None;
        let mut alpha = -MATE_SCORE * 2;
        let beta = MATE_SCORE * 2;

        for candidate in position.legal_moves() {
            let mut child = position.clone();
            child.play_unchecked(&candidate);
            let score = -negamax(&child, depth, -beta, -alpha);
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                alpha = alpha.max(score);
                best = Some((score, candidate));
            }
        }
        best.map(|(_, chosen)| chosen)
    }
}

impl SearchStrategy for Minimax {
    fn choose_move(&self, engine: &ChessEngine, depth: u8) -> Result<Option<String>, AiError> {
        Ok(Self::best_move(engine.position(), depth).map(|m| ChessEngine::uci_of(&m)))
    }
}

/// Score from the point of view of the side to move.
fn negamax(position: &Chess, depth: u8, mut alpha: i32, beta: i32) -> i32 {
    let moves = position.legal_moves();
    if moves.is_empty() {
        // Prefer the quickest mate: more remaining depth means a nearer mate.
        return if position.is_check() {
            -MATE_SCORE - i32::from(depth)
        } else {
            0
        };
    }
    if position.is_insufficient_material() {
        return 0;
    }
    if depth == 0 {
        return evaluate(position);
    }

    for candidate in &moves {
        let mut child = position.clone();
        child.play_unchecked(candidate);
        let score = -negamax(&child, depth - 1, -beta, -alpha);
        if score >= beta {
            return beta;
        }
        alpha = alpha.max(score);
    }
    alpha
}

fn evaluate(position: &Chess) -> i32 {
    let board = position.board();
    let mut white_minus_black = 0;
    for square in Square::ALL {
        let Some(piece) = board.piece_at(square) else {
            continue;
        };
        let value = role_value(piece.role) + centrality(square, piece.role);
        match piece.color {
            Color::White => white_minus_black += value,
            Color::Black => white_minus_black -= value,
        }
    }
    match position.turn() {
        Color::White => white_minus_black,
        Color::Black => -white_minus_black,
    }
}

fn role_value(role: Role) -> i32 {
    match role {
        Role::Pawn => 100,
        Role::Knight => 300,
        Role::Bishop => 320,
        Role::Rook => 500,
        Role::Queen => 900,
        Role::King => 0,
    }
}

/// Small bonus for minor pieces and pawns near the centre.
fn centrality(square: Square, role: Role) -> i32 {
    if !matches!(role, Role::Pawn | Role::Knight | Role::Bishop) {
        return 0;
    }
    let index = square as i32;
    let file = index % 8;
    let rank = index / 8;
    let file_distance = (2 * file - 7).abs();
    let rank_distance = (2 * rank - 7).abs();
    // Distances run 1..=7 from the centre outward.
    (14 - file_distance - rank_distance) * 2
}
