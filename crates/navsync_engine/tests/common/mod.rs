#![allow(dead_code)]

use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use navsync_core::{CachedSnapshot, CaptureRequest, Category, Link, MenuEntry};
use navsync_engine::{
    DescriptionGenerator, FailureKind, HostError, HostPlatform, LinkStore, MenuHost,
    Notification, RemoteError, WindowId,
};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

pub fn link(id: &str, title: &str, category_id: &str) -> Link {
    Link {
        id: id.to_string(),
        title: title.to_string(),
        url: format!("https://{id}.example.com/"),
        description: None,
        category_id: category_id.to_string(),
        icon: None,
        pinned: None,
        created_at: 0,
    }
}

pub fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn snapshot() -> CachedSnapshot {
    CachedSnapshot::new(
        vec![link("a", "Alpha", "c1"), link("b", "Beta", "c2")],
        vec![category("c1", "Work"), category("c2", "Reading")],
    )
}

/// Polls `check` until it holds or about a second has passed.
pub async fn eventually<F>(mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}

pub async fn within<T>(future: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(5), future)
        .await
        .expect("timed out")
}

#[derive(Default)]
pub struct FakeHost {
    pub opened: Mutex<Vec<WindowId>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub reject_open: bool,
}

impl FakeHost {
    pub fn opened(&self) -> Vec<WindowId> {
        self.opened.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HostPlatform for FakeHost {
    async fn open_panel(&self, window_id: WindowId) -> Result<(), HostError> {
        self.opened.lock().unwrap().push(window_id);
        if self.reject_open {
            return Err(HostError::Rejected("no user gesture".to_string()));
        }
        Ok(())
    }

    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

#[derive(Default)]
pub struct FakeMenuHost {
    pub entries: Mutex<Vec<MenuEntry>>,
    pub clears: AtomicUsize,
}

impl FakeMenuHost {
    pub fn ids(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.id.clone())
            .collect()
    }
}

impl MenuHost for FakeMenuHost {
    fn remove_all(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().unwrap().clear();
    }

    fn create(&self, entry: &MenuEntry) -> Result<(), HostError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.iter().any(|e| e.id == entry.id) {
            return Err(HostError::Rejected(format!("duplicate id {}", entry.id)));
        }
        entries.push(entry.clone());
        Ok(())
    }
}

pub struct FakeStore {
    pub configured: bool,
    pub snapshot: Mutex<Result<CachedSnapshot, RemoteError>>,
    pub fetches: AtomicUsize,
    pub created: Mutex<Vec<CaptureRequest>>,
    /// When set, each fetch waits for one permit before answering.
    pub gate: Option<Semaphore>,
}

impl FakeStore {
    pub fn serving(snapshot: CachedSnapshot) -> Self {
        Self {
            configured: true,
            snapshot: Mutex::new(Ok(snapshot)),
            fetches: AtomicUsize::new(0),
            created: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Serves `snapshot`, but every fetch blocks until [`FakeStore::release`].
    pub fn gated(snapshot: CachedSnapshot) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::serving(snapshot)
        }
    }

    /// Lets one held fetch answer.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn failing(kind: FailureKind) -> Self {
        let store = Self::serving(CachedSnapshot::default());
        *store.snapshot.lock().unwrap() = Err(RemoteError::new(kind, "boom"));
        store
    }

    pub fn set_snapshot(&self, snapshot: CachedSnapshot) {
        *self.snapshot.lock().unwrap() = Ok(snapshot);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LinkStore for FakeStore {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn create_link(&self, request: &CaptureRequest) -> Result<(), RemoteError> {
        self.created.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn fetch_snapshot(&self) -> Result<CachedSnapshot, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.snapshot.lock().unwrap().clone()
    }
}

/// Describes each link as "About {title}". Titles in `failing` error out.
/// When `cancel_after` is set, `cancel` fires during that many-th call.
pub struct FakeGenerator {
    pub configured: bool,
    pub failing: HashSet<String>,
    pub calls: AtomicUsize,
    pub cancel_after: Option<(usize, CancellationToken)>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self {
            configured: true,
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
            cancel_after: None,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DescriptionGenerator for FakeGenerator {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn generate(&self, title: &str, _url: &str) -> Result<String, RemoteError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((after, token)) = &self.cancel_after {
            if call == *after {
                token.cancel();
            }
        }
        if self.failing.contains(title) {
            return Err(RemoteError::new(FailureKind::HttpStatus(503), "unavailable"));
        }
        Ok(format!("About {title}"))
    }
}
