//! Rules engine adapter.
//!
//! The session layer never reaches into chess rules directly: it asks a
//! [`ChessEngine`] for the side to move, hands it move text, and reads back a
//! [`MoveOutcome`] and an [`EngineStatus`]. Legality and position export are
//! delegated to `shakmaty`.

mod chess;

pub use chess::{
    AppliedMove, ChessEngine, EngineError, EngineStatus, MoveOutcome, RejectReason, Side,
};
