//! Automated opponent: plays the bot's move whenever it holds the turn.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::ai::registry;
use crate::ai::{AiError, SearchStrategy};
use crate::domain::UserId;
use crate::engine::ChessEngine;
use crate::error::AppError;
use crate::sessions::{GameSession, MoveApplied, SessionState};

#[derive(Clone)]
pub struct AutomatedOpponentDriver {
    bot_id: UserId,
    strategy: Arc<dyn SearchStrategy>,
    depth: u8,
}

impl AutomatedOpponentDriver {
    pub fn new(bot_id: UserId, strategy: Arc<dyn SearchStrategy>, depth: u8) -> Self {
        Self {
            bot_id,
            strategy,
            depth,
        }
    }

    /// Driver using a strategy from the registry.
    pub fn from_registry(
        bot_id: UserId,
        name: &str,
        depth: u8,
        seed: Option<u64>,
    ) -> Result<Self, AppError> {
        let factory = registry::by_name(name)
            .ok_or_else(|| AppError::config(format!("Unknown search strategy '{name}'")))?;
        Ok(Self::new(bot_id, (factory.make)(seed), depth))
    }

    pub fn bot_id(&self) -> &UserId {
        &self.bot_id
    }

    /// Whether the automated participant holds the turn in an active game.
    pub fn is_due(&self, session: &GameSession) -> bool {
        session.state() == SessionState::Active && session.turn_holder() == &self.bot_id
    }

    /// Choose a move for the side to move in `engine`.
    ///
    /// Runs on the blocking pool and touches no realm state, so callers
    /// release their realm lock before awaiting it. `Ok(None)` means the
    /// position has no legal move.
    pub async fn search(&self, engine: ChessEngine) -> Result<Option<String>, AppError> {
        let strategy = Arc::clone(&self.strategy);
        let depth = self.depth;
        let started = Instant::now();

        let chosen = tokio::task::spawn_blocking(move || strategy.choose_move(&engine, depth))
            .await
            .map_err(|err| AiError::Aborted(err.to_string()))??;

        debug!(
            depth,
            elapsed_ms = started.elapsed().as_millis() as u64,
            chosen = ?chosen,
            "Search finished"
        );
        if chosen.is_none() {
            warn!("Search returned no move for an active session");
        }
        Ok(chosen)
    }

    /// Play `text` as the automated participant.
    pub fn apply(&self, session: &mut GameSession, text: &str) -> Result<MoveApplied, AppError> {
        let applied = session
            .apply_move(&self.bot_id, text)
            .map_err(|err| AiError::InvalidMove(format!("{text}: {err}")))?;
        Ok(applied)
    }
}
