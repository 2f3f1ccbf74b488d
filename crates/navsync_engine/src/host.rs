use navsync_core::MenuEntry;
use thiserror::Error;

use crate::{FailureKind, WindowId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("host rejected request: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

/// Best-effort user notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Failure class for `Failure` notifications.
    pub failure: Option<FailureKind>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Saved".to_string(),
            message: message.into(),
            failure: None,
        }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Failure,
            title: "Save failed".to_string(),
            message: message.into(),
            failure: Some(kind),
        }
    }
}

/// Panel and notification primitives of the browser.
#[async_trait::async_trait]
pub trait HostPlatform: Send + Sync {
    async fn open_panel(&self, window_id: WindowId) -> Result<(), HostError>;

    fn notify(&self, notification: Notification);
}

/// Context menu primitives of the browser.
pub trait MenuHost: Send + Sync {
    fn remove_all(&self);

    fn create(&self, entry: &MenuEntry) -> Result<(), HostError>;
}
