//! Durable homes for snapshot documents.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::document::SnapshotDocument;
use crate::error::AppError;

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// `Ok(None)` when no snapshot has been written yet.
    async fn read(&self) -> Result<Option<SnapshotDocument>, AppError>;

    /// Replace the stored snapshot as a whole.
    async fn write(&self, document: &SnapshotDocument) -> Result<(), AppError>;
}

/// JSON file on local disk.
///
/// Holds an exclusive lock on `<path>.lock` for as long as the store lives, so
/// a second process pointed at the same file fails fast instead of
/// overwriting it. Writes go to a temporary sibling which is synced and then
/// renamed over the target.
pub struct FileSnapshotStore {
    path: PathBuf,
    _lock: File,
}

impl FileSnapshotStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        use fs4::fs_std::FileExt;

        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::snapshot_io(format!("create {}", parent.display()), e)
            })?;
        }

        let lock_path = sibling(&path, "lock");
        let lock = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(&lock_path)
            .map_err(|e| AppError::snapshot_io(format!("open {}", lock_path.display()), e))?;

        // Ok(false) and WouldBlock both mean another process holds it.
        match lock.try_lock_exclusive() {
            Ok(true) => {
                debug!(lock_path = %lock_path.display(), "Snapshot lock acquired");
                Ok(Self { path, _lock: lock })
            }
            Ok(false) => Err(AppError::SnapshotLocked {
                path: lock_path.display().to_string(),
            }),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Err(AppError::SnapshotLocked {
                path: lock_path.display().to_string(),
            }),
            Err(e) => Err(AppError::snapshot_io(
                format!("lock {}", lock_path.display()),
                e,
            )),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn read(&self) -> Result<Option<SnapshotDocument>, AppError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::snapshot_io(
                    format!("read {}", self.path.display()),
                    e,
                ))
            }
        };
        let document = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::snapshot_corrupt(format!("{}: {e}", self.path.display()))
        })?;
        Ok(Some(document))
    }

    async fn write(&self, document: &SnapshotDocument) -> Result<(), AppError> {
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| AppError::internal(format!("serialize snapshot: {e}")))?;
        let temp_path = sibling(&self.path, "tmp");
        let io_err = |what: &str, e: std::io::Error| {
            AppError::snapshot_io(format!("{what} {}", temp_path.display()), e)
        };

        let mut file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| io_err("create", e))?;
        file.write_all(&bytes).await.map_err(|e| io_err("write", e))?;
        file.sync_all().await.map_err(|e| io_err("sync", e))?;
        drop(file);

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| AppError::snapshot_io(format!("rename onto {}", self.path.display()), e))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Snapshot written");
        Ok(())
    }
}

fn sibling(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// In-process store that counts writes and can be told to fail.
#[derive(Default)]
pub struct MemorySnapshotStore {
    document: Mutex<Option<SnapshotDocument>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: SnapshotDocument) -> Self {
        Self {
            document: Mutex::new(Some(document)),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn document(&self) -> Option<SnapshotDocument> {
        self.document.lock().clone()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn read(&self) -> Result<Option<SnapshotDocument>, AppError> {
        Ok(self.document.lock().clone())
    }

    async fn write(&self, document: &SnapshotDocument) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::snapshot_io(
                "memory store refused write",
                std::io::Error::other("injected failure"),
            ));
        }
        *self.document.lock() = Some(document.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
