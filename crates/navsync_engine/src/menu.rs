use std::sync::Arc;

use navsync_core::{build_menu, CachedSnapshot, SNAPSHOT_KEY};
use navsync_logging::{nav_debug, nav_info, nav_warn};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::cache::LocalCache;
use crate::host::MenuHost;

/// Keeps the host's context menu in line with the cached categories.
pub struct ContextMenuSynchronizer {
    cache: LocalCache,
    host: Arc<dyn MenuHost>,
    key: String,
}

impl ContextMenuSynchronizer {
    pub fn new(cache: LocalCache, host: Arc<dyn MenuHost>) -> Self {
        Self {
            cache,
            host,
            key: SNAPSHOT_KEY.to_string(),
        }
    }

    /// Clears the menu and recreates it from the current cache content.
    /// Returns the number of entries created.
    pub fn rebuild(&self) -> usize {
        let snapshot = self.cache.get(&self.key);
        self.recreate(snapshot.as_deref())
    }

    async fn rebuild_async(&self) -> usize {
        let snapshot = self.cache.load(&self.key).await;
        self.recreate(snapshot.as_deref())
    }

    fn recreate(&self, snapshot: Option<&CachedSnapshot>) -> usize {
        let entries = build_menu(snapshot);

        self.host.remove_all();
        let mut created = 0;
        for entry in &entries {
            match self.host.create(entry) {
                Ok(()) => created += 1,
                Err(err) => nav_warn!("Failed to create menu entry {}: {}", entry.id, err),
            }
        }
        nav_debug!("Context menu rebuilt with {} entries", created);
        created
    }

    /// Rebuilds once, then again after every change of the snapshot key,
    /// until `cancel` fires.
    pub async fn run(self, cancel: CancellationToken) {
        let mut changes = self.cache.subscribe();
        self.rebuild_async().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                change = changes.recv() => match change {
                    Ok(change) if change.key == self.key => {
                        self.rebuild_async().await;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        nav_debug!("Menu sync lagged by {} change(s)", skipped);
                        self.rebuild_async().await;
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
        nav_info!("Context menu synchronizer stopped");
    }
}
