//! Game sessions and the per-realm table that holds them.

pub mod game;
pub mod store;

pub use game::{BoardImage, EndReason, GameSession, MoveApplied, SessionState, TurnOutcome};
pub use store::SessionStore;
