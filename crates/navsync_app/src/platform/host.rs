//! Terminal stand-ins for the browser's panel, notification and context
//! menu primitives.

use std::sync::Mutex;

use navsync_core::{MenuEntry, MenuEntryKind};
use navsync_engine::{HostError, HostPlatform, MenuHost, Notification, NotificationKind, WindowId};
use navsync_logging::{nav_debug, nav_info};

#[derive(Debug, Default)]
pub(crate) struct ConsoleHost;

#[async_trait::async_trait]
impl HostPlatform for ConsoleHost {
    async fn open_panel(&self, window_id: WindowId) -> Result<(), HostError> {
        nav_info!("Open panel requested for window {}", window_id);
        println!("[panel] open in window {window_id}");
        Ok(())
    }

    fn notify(&self, notification: Notification) {
        let marker = match notification.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Failure => "error",
        };
        println!("[{marker}] {}: {}", notification.title, notification.message);
    }
}

/// Keeps the created entries so they can be printed as a tree.
#[derive(Debug, Default)]
pub(crate) struct ConsoleMenu {
    entries: Mutex<Vec<MenuEntry>>,
}

impl ConsoleMenu {
    pub(crate) fn render(&self) -> String {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut out = String::new();
        for entry in entries.iter() {
            let indent = if entry.parent_id.is_some() { "  " } else { "" };
            match entry.kind {
                MenuEntryKind::Separator => out.push_str(&format!("{indent}----\n")),
                MenuEntryKind::Normal => {
                    out.push_str(&format!("{indent}{} [{}]\n", entry.title, entry.id))
                }
            }
        }
        out
    }
}

impl MenuHost for ConsoleMenu {
    fn remove_all(&self) {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }

    fn create(&self, entry: &MenuEntry) -> Result<(), HostError> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if entries.iter().any(|e| e.id == entry.id) {
            return Err(HostError::Rejected(format!("duplicate menu id {}", entry.id)));
        }
        nav_debug!("Menu entry {}", entry.id);
        entries.push(entry.clone());
        Ok(())
    }
}
