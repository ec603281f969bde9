//! Per-realm session table.
//!
//! Sessions are keyed by [`PairKey`]. Every human participant appears in at
//! most one of them; the automated opponent may sit in any number. Lookups by
//! participant scan the table; realms hold a handful of games, so no reverse
//! index is kept.

use std::collections::BTreeMap;

use rand::Rng;
use time::OffsetDateTime;
use tracing::debug;

use super::game::GameSession;
use crate::domain::{PairKey, UserId};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: BTreeMap<PairKey, GameSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_session_key_for(&self, user: &UserId) -> Option<PairKey> {
        self.sessions
            .iter()
            .find(|(key, _)| key.contains(user))
            .map(|(key, _)| key.clone())
    }

    pub fn is_in_session(&self, user: &UserId) -> bool {
        self.sessions.keys().any(|key| key.contains(user))
    }

    /// Whether `user` is tied up in a game. The automated opponent never is.
    fn is_busy(&self, user: &UserId, automated: &UserId) -> bool {
        user != automated && self.is_in_session(user)
    }

    /// Start a game between `p1` and `p2`, assigning colours by coin flip.
    pub fn create<R: Rng + ?Sized>(
        &mut self,
        p1: UserId,
        p2: UserId,
        automated: &UserId,
        rng: &mut R,
    ) -> Result<&mut GameSession, DomainError> {
        if self.is_busy(&p1, automated) || self.is_busy(&p2, automated) {
            return Err(DomainError::AlreadyInSession);
        }
        let key = PairKey::new(p1.clone(), p2.clone());
        let (white, black) = if rng.random_bool(0.5) {
            (p1, p2)
        } else {
            (p2, p1)
        };
        debug!(session = %key, white = %white, black = %black, "Creating session");

        let session = GameSession::new(white, black, OffsetDateTime::now_utc());
        Ok(self.sessions.entry(key).or_insert(session))
    }

    /// Put back a session loaded from a snapshot.
    pub fn insert_restored(
        &mut self,
        session: GameSession,
        automated: &UserId,
    ) -> Result<(), DomainError> {
        if self.is_busy(session.white(), automated) || self.is_busy(session.black(), automated) {
            return Err(DomainError::AlreadyInSession);
        }
        let key = PairKey::new(session.white().clone(), session.black().clone());
        self.sessions.insert(key, session);
        Ok(())
    }

    pub fn remove(&mut self, key: &PairKey) -> Option<GameSession> {
        self.sessions.remove(key)
    }

    pub fn session(&self, key: &PairKey) -> Option<&GameSession> {
        self.sessions.get(key)
    }

    pub fn session_mut(&mut self, key: &PairKey) -> Option<&mut GameSession> {
        self.sessions.get_mut(key)
    }

    /// The game `user` plays in, with its key.
    pub fn entry_for(&mut self, user: &UserId) -> Option<(PairKey, &mut GameSession)> {
        self.sessions
            .iter_mut()
            .find(|(key, _)| key.contains(user))
            .map(|(key, session)| (key.clone(), session))
    }

    pub fn session_for(&self, user: &UserId) -> Option<&GameSession> {
        self.sessions
            .iter()
            .find(|(key, _)| key.contains(user))
            .map(|(_, session)| session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, &GameSession)> {
        self.sessions.iter()
    }
}
