//! Search strategy trait definition.

use std::fmt;

use crate::engine::ChessEngine;
use crate::error::AppError;

/// Errors that can occur while choosing a move.
#[derive(Debug)]
pub enum AiError {
    /// The blocking search task panicked or was cancelled
    Aborted(String),
    /// Strategy encountered an internal error
    Internal(String),
    /// Strategy produced a move the engine refused
    InvalidMove(String),
}

impl fmt::Display for AiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AiError::Aborted(msg) => write!(f, "search aborted: {msg}"),
            AiError::Internal(msg) => write!(f, "search internal error: {msg}"),
            AiError::InvalidMove(msg) => write!(f, "search invalid move: {msg}"),
        }
    }
}

impl std::error::Error for AiError {}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::internal(format!("AI error: {err}"))
    }
}

/// A move chooser for the automated opponent.
///
/// Implementations receive a snapshot of the engine and return coordinate
/// notation for a legal move, or `None` when the side to move has no legal
/// move. Calls are CPU-bound and run on the blocking pool.
pub trait SearchStrategy: Send + Sync {
    fn choose_move(&self, engine: &ChessEngine, depth: u8) -> Result<Option<String>, AiError>;
}
