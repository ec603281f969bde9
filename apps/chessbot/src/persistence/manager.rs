//! When and how the registry reaches the snapshot store.
//!
//! Three triggers write a snapshot: a fixed interval task, the shutdown hook
//! and [`PersistenceManager::note_mutation`] after a state-changing command.
//! The last one is debounced so a burst of moves costs a single write, and
//! commands spawn it rather than wait for it. Writes are serialized; a failed
//! write is logged and the next trigger tries again.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use super::document::{RealmRecord, SnapshotDocument, SNAPSHOT_VERSION};
use super::store::SnapshotStore;
use crate::domain::UserId;
use crate::error::AppError;
use crate::realm::RealmRegistry;

pub struct PersistenceManager {
    store: Arc<dyn SnapshotStore>,
    debounce: Duration,
    last_snapshot: Mutex<Option<Instant>>,
    write_lock: tokio::sync::Mutex<()>,
    cancel: CancellationToken,
    periodic: Mutex<Option<JoinHandle<()>>>,
    background: TaskTracker,
}

impl PersistenceManager {
    pub fn new(store: Arc<dyn SnapshotStore>, debounce: Duration) -> Self {
        Self {
            store,
            debounce,
            last_snapshot: Mutex::new(None),
            write_lock: tokio::sync::Mutex::new(()),
            cancel: CancellationToken::new(),
            periodic: Mutex::new(None),
            background: TaskTracker::new(),
        }
    }

    /// Registry from the stored snapshot, or an empty one if none exists.
    ///
    /// Any read or decode failure is returned as is; callers treat it as fatal.
    pub async fn load_on_startup(
        &self,
        default_prefix: &str,
        automated: &UserId,
    ) -> Result<RealmRegistry, AppError> {
        let Some(document) = self.store.read().await? else {
            info!("No snapshot found, starting with an empty registry");
            return Ok(RealmRegistry::new(default_prefix));
        };
        if document.version != SNAPSHOT_VERSION {
            return Err(AppError::snapshot_corrupt(format!(
                "unsupported snapshot version {}",
                document.version
            )));
        }

        let realms = document
            .realms
            .into_iter()
            .map(|record| record.into_realm(automated))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            realms = realms.len(),
            saved_at = %document.saved_at,
            "Snapshot loaded"
        );
        Ok(RealmRegistry::from_realms(default_prefix, realms))
    }

    /// Serialize every realm and replace the stored snapshot.
    pub async fn snapshot(&self, registry: &RealmRegistry) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;

        let mut records = Vec::with_capacity(registry.len());
        for handle in registry.all() {
            let realm = handle.lock().await;
            records.push(RealmRecord::from_realm(&realm));
        }
        let document = SnapshotDocument::new(records);
        self.store.write(&document).await?;

        *self.last_snapshot.lock() = Some(Instant::now());
        debug!(realms = document.realms.len(), "Snapshot saved");
        Ok(())
    }

    /// Snapshot after a mutation unless one completed within the debounce
    /// window. Returns whether a snapshot was written.
    pub async fn note_mutation(&self, registry: &RealmRegistry) -> bool {
        let previous = {
            let mut last = self.last_snapshot.lock();
            if last.is_some_and(|at| at.elapsed() < self.debounce) {
                return false;
            }
            // Claim the window so concurrent callers skip while this one writes.
            last.replace(Instant::now())
        };

        match self.snapshot(registry).await {
            Ok(()) => true,
            Err(err) => {
                *self.last_snapshot.lock() = previous;
                warn!(error = %err, "Opportunistic snapshot failed; will retry on next trigger");
                false
            }
        }
    }

    /// [`note_mutation`](Self::note_mutation) on a background task, so the
    /// caller never waits on realm locks or disk.
    pub fn spawn_note_mutation(self: &Arc<Self>, registry: Arc<RealmRegistry>) {
        let manager = Arc::clone(self);
        self.background.spawn(async move {
            manager.note_mutation(&registry).await;
        });
    }

    /// Resolves once every background snapshot spawned so far has finished.
    pub async fn settled(&self) {
        while !self.background.is_empty() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    /// Start the interval task. Its first write happens one `period` from now.
    pub fn spawn_periodic(self: &Arc<Self>, registry: Arc<RealmRegistry>, period: Duration) {
        let manager = Arc::clone(self);
        let cancel = self.cancel.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(err) = manager.snapshot(&registry).await {
                            warn!(
                                error = %err,
                                "Periodic snapshot failed; will retry on next tick"
                            );
                        }
                    }
                }
            }
            debug!("Periodic snapshot task stopped");
        });
        if let Some(previous) = self.periodic.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Stop the interval task, let background snapshots finish and write one
    /// final snapshot.
    pub async fn shutdown(&self, registry: &RealmRegistry) -> Result<(), AppError> {
        self.cancel.cancel();
        self.background.close();
        self.background.wait().await;
        let handle = self.periodic.lock().take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                warn!(error = %err, "Periodic snapshot task ended abnormally");
            }
        }
        self.snapshot(registry).await?;
        info!("Final snapshot written");
        Ok(())
    }
}
