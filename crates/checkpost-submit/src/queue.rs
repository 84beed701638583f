//! Durable queue of records still awaiting delivery.
//!
//! The queue is an explicit object owning its in-memory cache and an
//! injected storage handle. First access lazily loads the persisted state;
//! every mutation goes through [`PendingQueue::set`], which rewrites
//! storage before the cache is replaced, keeping the two copies identical.
//!
//! There is no locking across queue instances: two concurrent passes that
//! each read and later rewrite the same storage will clobber one another's
//! update. Passes are expected to be driven one at a time.

use std::{future::Future, io::ErrorKind, path::PathBuf, pin::Pin, sync::Arc};

use checkpost_core::{error::Result as CoreResult, CoreError, Record};
use tracing::debug;

use crate::error::{Result, SubmitError};

/// Storage operations required by the durable queue.
///
/// Abstracts the single well-known location holding the serialized pending
/// list, so tests can substitute in-memory implementations for the
/// file-backed production store.
pub trait QueueStore: Send + Sync + 'static {
    /// Loads the persisted pending list.
    ///
    /// Returns `None` when nothing has ever been persisted; storage-level
    /// failures and undecodable state are errors.
    fn load(&self) -> Pin<Box<dyn Future<Output = CoreResult<Option<Vec<Record>>>> + Send + '_>>;

    /// Replaces the persisted pending list.
    ///
    /// The write must be complete when the future resolves; a failure here
    /// is fatal to the caller, never retried internally.
    fn persist<'a>(
        &'a self,
        records: &'a [Record],
    ) -> Pin<Box<dyn Future<Output = CoreResult<()>> + Send + 'a>>;
}

/// File-backed queue store holding one serialized record list.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store persisting to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store persists to.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl QueueStore for JsonFileStore {
    fn load(&self) -> Pin<Box<dyn Future<Output = CoreResult<Option<Vec<Record>>>> + Send + '_>> {
        Box::pin(async move {
            let bytes = match tokio::fs::read(&self.path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => {
                    return Err(CoreError::storage(format!(
                        "failed to read queue file {}: {e}",
                        self.path.display()
                    )))
                },
            };

            if bytes.is_empty() {
                return Ok(None);
            }

            let records = serde_json::from_slice(&bytes).map_err(|e| {
                CoreError::serialization(format!(
                    "queue file {} did not decode: {e}",
                    self.path.display()
                ))
            })?;
            Ok(Some(records))
        })
    }

    fn persist<'a>(
        &'a self,
        records: &'a [Record],
    ) -> Pin<Box<dyn Future<Output = CoreResult<()>> + Send + 'a>> {
        Box::pin(async move {
            let bytes = serde_json::to_vec(records)
                .map_err(|e| CoreError::serialization(format!("queue did not encode: {e}")))?;

            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        CoreError::storage(format!(
                            "failed to create queue directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
            }

            tokio::fs::write(&self.path, bytes).await.map_err(|e| {
                CoreError::storage(format!(
                    "failed to write queue file {}: {e}",
                    self.path.display()
                ))
            })
        })
    }
}

/// The pending-record queue: cached in memory, rewritten on every mutation.
pub struct PendingQueue {
    store: Arc<dyn QueueStore>,
    cached: Option<Vec<Record>>,
}

impl std::fmt::Debug for PendingQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingQueue")
            .field("cached", &self.cached)
            .finish_non_exhaustive()
    }
}

impl PendingQueue {
    /// Creates a queue backed by the given store.
    pub fn new(store: Arc<dyn QueueStore>) -> Self {
        Self { store, cached: None }
    }

    /// Returns the current pending sequence.
    ///
    /// The first call per queue lifetime loads from storage (an empty
    /// sequence when nothing was persisted); later calls serve the cache.
    /// Callers never mutate the returned slice; replacement goes through
    /// [`Self::set`].
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Storage` if the initial load fails.
    pub async fn get(&mut self) -> Result<&[Record]> {
        if self.cached.is_none() {
            let records = self.store.load().await?.unwrap_or_default();
            debug!(pending = records.len(), "queue loaded from storage");
            self.cached = Some(records);
        }

        self.cached
            .as_deref()
            .ok_or_else(|| SubmitError::internal("queue cache missing after load"))
    }

    /// Replaces the pending sequence, persisting before the cache changes.
    ///
    /// Returns the queue handle to permit call chaining.
    ///
    /// # Errors
    ///
    /// Returns `SubmitError::Storage` if persistence fails; the cache is
    /// left unchanged in that case.
    pub async fn set(&mut self, records: Vec<Record>) -> Result<&mut Self> {
        self.store.persist(&records).await?;
        debug!(pending = records.len(), "queue rewritten");
        self.cached = Some(records);
        Ok(self)
    }
}
