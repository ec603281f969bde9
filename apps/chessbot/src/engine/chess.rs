use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};

/// Plies without capture or pawn move after which the game is drawn.
const FIFTY_MOVE_PLIES: u32 = 100;
const REPETITION_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    White,
    Black,
}

impl From<Color> for Side {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Side::White,
            Color::Black => Side::Black,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => f.write_str("White"),
            Side::Black => f.write_str("Black"),
        }
    }
}

/// Terminal classification of the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    InProgress,
    Checkmate { winner: Side },
    Stalemate,
    ThreefoldRepetition,
    FiftyMoveRule,
    InsufficientMaterial,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    /// Coordinate notation as accepted from players (`e2e4`).
    pub uci: String,
    /// Standard algebraic notation with check markers (`e4`, `Qh4#`).
    pub san: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Unparseable,
    Illegal,
}

/// Result of offering move text to the engine. A rejection never touches the
/// position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Applied(AppliedMove),
    Rejected(RejectReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    InvalidFen(String),
    IllegalPosition(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidFen(detail) => write!(f, "invalid FEN: {detail}"),
            EngineError::IllegalPosition(detail) => write!(f, "illegal position: {detail}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// One game's position plus the history needed for repetition detection.
#[derive(Debug, Clone)]
pub struct ChessEngine {
    position: Chess,
    // Repetition keys of every position reached, starting position included.
    history: Vec<String>,
}

impl Default for ChessEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessEngine {
    pub fn new() -> Self {
        let position = Chess::default();
        let history = vec![repetition_key(&position)];
        Self { position, history }
    }

    /// Rebuild an engine from an exported FEN and its repetition history.
    ///
    /// An empty history is seeded with the restored position.
    pub fn from_fen(fen: &str, history: Vec<String>) -> Result<Self, EngineError> {
        let parsed: Fen = fen
            .parse()
            .map_err(|err| EngineError::InvalidFen(format!("{err}")))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|err| EngineError::IllegalPosition(format!("{err}")))?;
        let history = if history.is_empty() {
            vec![repetition_key(&position)]
        } else {
            history
        };
        Ok(Self { position, history })
    }

    pub fn side_to_move(&self) -> Side {
        self.position.turn().into()
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }

    pub fn try_move(&mut self, text: &str) -> MoveOutcome {
        let Ok(uci) = text.trim().parse::<UciMove>() else {
            return MoveOutcome::Rejected(RejectReason::Unparseable);
        };
        let Ok(chess_move) = uci.to_move(&self.position) else {
            return MoveOutcome::Rejected(RejectReason::Illegal);
        };
        MoveOutcome::Applied(self.play_legal(&chess_move))
    }

    /// Coordinate notation for a move legal in the current position.
    pub fn uci_of(chess_move: &Move) -> String {
        UciMove::from_move(chess_move, CastlingMode::Standard).to_string()
    }

    pub fn status(&self) -> EngineStatus {
        let position = &self.position;
        if position.is_checkmate() {
            // The side to move has been mated.
            let winner = Side::from(position.turn().other());
            return EngineStatus::Checkmate { winner };
        }
        if position.is_stalemate() {
            return EngineStatus::Stalemate;
        }
        if position.is_insufficient_material() {
            return EngineStatus::InsufficientMaterial;
        }
        if position.halfmoves() >= FIFTY_MOVE_PLIES {
            return EngineStatus::FiftyMoveRule;
        }
        let current = repetition_key(position);
        let seen = self.history.iter().filter(|key| **key == current).count();
        if seen >= REPETITION_LIMIT {
            return EngineStatus::ThreefoldRepetition;
        }
        EngineStatus::InProgress
    }

    fn play_legal(&mut self, chess_move: &Move) -> AppliedMove {
        let uci = Self::uci_of(chess_move);
        let mut next = self.position.clone();
        let san = SanPlus::from_move_and_play_unchecked(&mut next, chess_move).to_string();
        self.position = next;
        self.history.push(repetition_key(&self.position));
        AppliedMove { uci, san }
    }
}

/// Board, side to move, castling rights and en passant square; move counters
/// are excluded so transpositions compare equal.
fn repetition_key(position: &Chess) -> String {
    let fen = Fen::from_position(position.clone(), EnPassantMode::Legal).to_string();
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}
