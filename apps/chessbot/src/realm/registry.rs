use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

use super::Realm;
use crate::domain::RealmId;

/// Shared, lockable handle to one realm.
///
/// Every check-then-mutate sequence on a realm runs while holding this lock;
/// different realms never contend.
pub type RealmHandle = Arc<Mutex<Realm>>;

/// Process-wide lookup from realm id to realm, filled lazily.
#[derive(Debug)]
pub struct RealmRegistry {
    realms: DashMap<RealmId, RealmHandle>,
    default_prefix: String,
}

impl RealmRegistry {
    pub fn new(default_prefix: impl Into<String>) -> Self {
        Self {
            realms: DashMap::new(),
            default_prefix: default_prefix.into(),
        }
    }

    /// Registry pre-populated from a loaded snapshot.
    pub fn from_realms(default_prefix: impl Into<String>, realms: Vec<Realm>) -> Self {
        let registry = Self::new(default_prefix);
        for realm in realms {
            registry
                .realms
                .insert(realm.id().clone(), Arc::new(Mutex::new(realm)));
        }
        registry
    }

    pub fn default_prefix(&self) -> &str {
        &self.default_prefix
    }

    /// Existing realm, or a fresh one with the default prefix. Two callers
    /// racing on an unseen id get the same handle.
    pub fn get_or_create(&self, id: &RealmId) -> RealmHandle {
        if let Some(existing) = self.realms.get(id) {
            return Arc::clone(existing.value());
        }
        let entry = self.realms.entry(id.clone()).or_insert_with(|| {
            info!(realm = %id, "Creating realm");
            Arc::new(Mutex::new(Realm::new(id.clone(), self.default_prefix.clone())))
        });
        Arc::clone(entry.value())
    }

    pub fn get(&self, id: &RealmId) -> Option<RealmHandle> {
        self.realms.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Handles to every realm, ordered by id.
    pub fn all(&self) -> Vec<RealmHandle> {
        let mut entries: Vec<(RealmId, RealmHandle)> = self
            .realms
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries.into_iter().map(|(_, handle)| handle).collect()
    }

    pub fn len(&self) -> usize {
        self.realms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.realms.is_empty()
    }
}
