//! On-disk shape of a registry snapshot.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::{RealmId, UserId};
use crate::engine::ChessEngine;
use crate::error::AppError;
use crate::realm::Realm;
use crate::sessions::GameSession;

pub const SNAPSHOT_VERSION: u32 = 1;

/// The whole registry, written and read as one JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub version: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub saved_at: OffsetDateTime,
    pub realms: Vec<RealmRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmRecord {
    pub id: RealmId,
    pub prefix: String,
    #[serde(default)]
    pub sessions: Vec<SessionRecord>,
    #[serde(default)]
    pub pending: Vec<PendingRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub white: UserId,
    pub black: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub fen: String,
    /// Repetition keys of every position reached so far.
    #[serde(default)]
    pub history: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRecord {
    pub requester: UserId,
    pub target: UserId,
}

impl SnapshotDocument {
    pub fn new(realms: Vec<RealmRecord>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: OffsetDateTime::now_utc(),
            realms,
        }
    }
}

impl RealmRecord {
    pub fn from_realm(realm: &Realm) -> Self {
        let sessions = realm
            .sessions
            .iter()
            .map(|(_, session)| SessionRecord {
                white: session.white().clone(),
                black: session.black().clone(),
                created_at: session.created_at(),
                fen: session.engine().fen(),
                history: session.engine().history().to_vec(),
            })
            .collect();
        let pending = realm
            .pending
            .edges()
            .map(|(requester, target)| PendingRecord {
                requester: requester.clone(),
                target: target.clone(),
            })
            .collect();

        Self {
            id: realm.id().clone(),
            prefix: realm.prefix.clone(),
            sessions,
            pending,
        }
    }

    /// Rebuild the realm. Unplayable positions or a human listed in two
    /// sessions make the snapshot corrupt; `automated` may appear in any
    /// number of them.
    pub fn into_realm(self, automated: &UserId) -> Result<Realm, AppError> {
        let mut realm = Realm::new(self.id, self.prefix);
        for record in self.sessions {
            let engine = ChessEngine::from_fen(&record.fen, record.history).map_err(|err| {
                AppError::snapshot_corrupt(format!(
                    "realm {}: session {} vs {}: {err}",
                    realm.id(),
                    record.white,
                    record.black
                ))
            })?;
            let session =
                GameSession::restore(record.white, record.black, record.created_at, engine);
            realm.sessions.insert_restored(session, automated).map_err(|err| {
                AppError::snapshot_corrupt(format!("realm {}: {err}", realm.id()))
            })?;
        }
        for edge in self.pending {
            realm.pending.insert(edge.requester, edge.target);
        }
        Ok(realm)
    }
}
