//! Observable key-value cache for synchronized snapshots.
//!
//! Every `put` replaces the whole value for a key and then notifies all
//! subscribers with the key that changed. Readers never see a partially
//! written snapshot.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use navsync_core::CachedSnapshot;
use navsync_logging::{nav_debug, nav_warn};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::persist::{AtomicFileWriter, PersistError};

const CHANGE_CAPACITY: usize = 32;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("cache task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Durable storage behind [`LocalCache`].
pub trait CacheBackend: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<CachedSnapshot>, CacheError>;
    fn store(&self, key: &str, snapshot: &CachedSnapshot) -> Result<(), CacheError>;
}

#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: Mutex<HashMap<String, CachedSnapshot>>,
}

impl CacheBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<CachedSnapshot>, CacheError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    fn store(&self, key: &str, snapshot: &CachedSnapshot) -> Result<(), CacheError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(key.to_string(), snapshot.clone());
        Ok(())
    }
}

/// One JSON file per key, `{dir}/{key}.json`, written atomically.
#[derive(Debug, Clone)]
pub struct FileBackend {
    writer: AtomicFileWriter,
}

impl FileBackend {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
        }
    }

    fn filename(key: &str) -> String {
        format!("{key}.json")
    }
}

impl CacheBackend for FileBackend {
    fn load(&self, key: &str) -> Result<Option<CachedSnapshot>, CacheError> {
        match self.writer.read(&Self::filename(key))? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn store(&self, key: &str, snapshot: &CachedSnapshot) -> Result<(), CacheError> {
        let content = serde_json::to_vec_pretty(snapshot)?;
        self.writer.write(&Self::filename(key), &content)?;
        Ok(())
    }
}

/// Notification sent to subscribers after a key was replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheChange {
    pub key: String,
}

/// Process-wide cache handle. Clones share the same slots and observers.
#[derive(Clone)]
pub struct LocalCache {
    inner: Arc<CacheInner>,
}

struct CacheInner {
    backend: Box<dyn CacheBackend>,
    slots: Mutex<HashMap<String, Arc<CachedSnapshot>>>,
    changes: broadcast::Sender<CacheChange>,
}

impl LocalCache {
    pub fn new(backend: impl CacheBackend + 'static) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            inner: Arc::new(CacheInner {
                backend: Box::new(backend),
                slots: Mutex::new(HashMap::new()),
                changes,
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    /// Current value for `key`. Backend failures are logged and read as a miss.
    pub fn get(&self, key: &str) -> Option<Arc<CachedSnapshot>> {
        let mut slots = self.lock_slots();
        if let Some(found) = slots.get(key) {
            return Some(found.clone());
        }
        match self.inner.backend.load(key) {
            Ok(Some(snapshot)) => {
                let snapshot = Arc::new(snapshot);
                slots.insert(key.to_string(), snapshot.clone());
                Some(snapshot)
            }
            Ok(None) => None,
            Err(err) => {
                nav_warn!("Cache read for {} failed: {}", key, err);
                None
            }
        }
    }

    /// Replaces the value for `key` and notifies observers.
    pub fn put(&self, key: &str, snapshot: CachedSnapshot) -> Result<(), CacheError> {
        {
            let mut slots = self.lock_slots();
            self.inner.backend.store(key, &snapshot)?;
            slots.insert(key.to_string(), Arc::new(snapshot));
        }
        let receivers = self
            .inner
            .changes
            .send(CacheChange {
                key: key.to_string(),
            })
            .unwrap_or(0);
        nav_debug!("Cache key {} replaced, {} observer(s) notified", key, receivers);
        Ok(())
    }

    /// [`LocalCache::get`] on the blocking pool. Async tasks use this so a
    /// file backend never stalls the runtime.
    pub async fn load(&self, key: &str) -> Option<Arc<CachedSnapshot>> {
        let cache = self.clone();
        let key = key.to_string();
        match tokio::task::spawn_blocking(move || cache.get(&key)).await {
            Ok(found) => found,
            Err(err) => {
                nav_warn!("Cache read task failed: {}", err);
                None
            }
        }
    }

    /// [`LocalCache::put`] on the blocking pool.
    pub async fn store(&self, key: &str, snapshot: CachedSnapshot) -> Result<(), CacheError> {
        let cache = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || cache.put(&key, snapshot)).await?
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CacheChange> {
        self.inner.changes.subscribe()
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<CachedSnapshot>>> {
        self.inner
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
