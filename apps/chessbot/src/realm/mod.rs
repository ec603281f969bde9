//! Realms: one isolated game universe per chat server.

mod registry;

pub use registry::{RealmHandle, RealmRegistry};

use crate::domain::RealmId;
use crate::matchmaking::PendingRequests;
use crate::sessions::SessionStore;

/// Everything one chat server owns: its command prefix, its running games
/// and the solicitations still waiting for an answer.
#[derive(Debug, Clone)]
pub struct Realm {
    id: RealmId,
    pub prefix: String,
    pub sessions: SessionStore,
    pub pending: PendingRequests,
}

impl Realm {
    pub fn new(id: RealmId, prefix: impl Into<String>) -> Self {
        Self {
            id,
            prefix: prefix.into(),
            sessions: SessionStore::new(),
            pending: PendingRequests::default(),
        }
    }

    pub fn id(&self) -> &RealmId {
        &self.id
    }
}
