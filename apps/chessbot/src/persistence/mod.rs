//! Registry snapshots: document format, stores and the save policy.

mod document;
mod manager;
mod store;

pub use document::{PendingRecord, RealmRecord, SessionRecord, SnapshotDocument, SNAPSHOT_VERSION};
pub use manager::PersistenceManager;
pub use store::{FileSnapshotStore, MemorySnapshotStore, SnapshotStore};
