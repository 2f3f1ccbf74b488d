//! Panel instance runtime: runs the core panel state machine and executes
//! its effects against the cache and the remote store.

use std::collections::VecDeque;
use std::sync::Arc;

use navsync_core::{update, CachedSnapshot, Effect, Msg, PanelState, PanelViewModel, SNAPSHOT_KEY};
use navsync_logging::{nav_debug, nav_info, nav_warn};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

use crate::cache::LocalCache;
use crate::channel::{Port, PortMessage, RuntimeMessage};
use crate::remote::LinkStore;
use crate::WindowId;

pub struct PanelDriver {
    state: PanelState,
    cache: LocalCache,
    store: Arc<dyn LinkStore>,
    generation: u64,
}

/// A snapshot fetch requested by the state machine but not yet run.
pub struct PendingFetch {
    generation: u64,
    store: Arc<dyn LinkStore>,
}

impl PendingFetch {
    pub async fn run(self) -> FetchOutcome {
        let msg = match self.store.fetch_snapshot().await {
            Ok(snapshot) => Msg::FetchSucceeded(snapshot),
            Err(err) => {
                nav_warn!("Panel sync failed: {}", err);
                Msg::FetchFailed(err.to_string())
            }
        };
        FetchOutcome {
            generation: self.generation,
            msg,
        }
    }
}

/// Result of a [`PendingFetch`], tagged with the request it answers.
pub struct FetchOutcome {
    generation: u64,
    msg: Msg,
}

impl PanelDriver {
    pub fn new(cache: LocalCache, store: Arc<dyn LinkStore>) -> Self {
        Self {
            state: PanelState::new(),
            cache,
            store,
            generation: 0,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn view(&self) -> PanelViewModel {
        self.state.view()
    }

    /// The current view if anything changed since the last call.
    pub fn take_view(&mut self) -> Option<PanelViewModel> {
        self.state.consume_dirty().then(|| self.state.view())
    }

    /// Applies `msg` and runs the cache effects it leads to. A requested
    /// snapshot fetch is handed back instead of being awaited; only the most
    /// recent request's outcome is accepted by [`PanelDriver::complete`].
    pub async fn apply(&mut self, msg: Msg) -> Option<PendingFetch> {
        let mut pending = None;
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            for effect in effects {
                match effect {
                    Effect::ReadCache => inbox.push_back(Msg::CacheRead(self.read_cache().await)),
                    Effect::WriteCache(snapshot) => self.write_cache(snapshot).await,
                    Effect::FetchSnapshot => {
                        self.generation += 1;
                        pending = Some(PendingFetch {
                            generation: self.generation,
                            store: self.store.clone(),
                        });
                    }
                }
            }
        }
        pending
    }

    /// Feeds a finished fetch back in. Outcomes of superseded requests are
    /// dropped.
    pub async fn complete(&mut self, outcome: FetchOutcome) -> Option<PendingFetch> {
        if outcome.generation != self.generation {
            nav_debug!(
                "Dropping stale fetch {} (latest {})",
                outcome.generation,
                self.generation
            );
            return None;
        }
        self.apply(outcome.msg).await
    }

    /// Applies `msg` and waits for every fetch it triggers.
    /// Returns whether the view changed.
    pub async fn dispatch(&mut self, msg: Msg) -> bool {
        let mut pending = self.apply(msg).await;
        while let Some(fetch) = pending.take() {
            let outcome = fetch.run().await;
            pending = self.complete(outcome).await;
        }
        self.state.consume_dirty()
    }

    async fn read_cache(&self) -> Option<CachedSnapshot> {
        let cached = self.cache.load(SNAPSHOT_KEY).await;
        nav_debug!("Panel cache read hit={}", cached.is_some());
        cached.map(|s| (*s).clone())
    }

    async fn write_cache(&self, snapshot: CachedSnapshot) {
        if let Err(err) = self.cache.store(SNAPSHOT_KEY, snapshot).await {
            nav_warn!("Failed to write snapshot to cache: {}", err);
        }
    }
}

/// Why a panel task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelExit {
    /// The background sent a close instruction.
    ClosedByBackground,
    /// The panel's UI side went away.
    UserClosed,
}

/// Handle to a running panel task.
pub struct PanelHandle {
    window_id: WindowId,
    msg_tx: mpsc::UnboundedSender<Msg>,
    views: mpsc::UnboundedReceiver<PanelViewModel>,
    task: JoinHandle<PanelExit>,
}

impl PanelHandle {
    pub fn window_id(&self) -> WindowId {
        self.window_id
    }

    /// Forwards a UI message (search, toggle, refresh) to the panel.
    pub fn send(&self, msg: Msg) -> bool {
        self.msg_tx.send(msg).is_ok()
    }

    /// Next rendered view, or `None` once the panel task ended.
    pub async fn next_view(&mut self) -> Option<PanelViewModel> {
        self.views.recv().await
    }

    /// Waits for the next view that satisfies `predicate`.
    pub async fn view_where<F>(&mut self, predicate: F) -> Option<PanelViewModel>
    where
        F: Fn(&PanelViewModel) -> bool,
    {
        while let Some(view) = self.views.recv().await {
            if predicate(&view) {
                return Some(view);
            }
        }
        None
    }

    /// Drops the UI side and waits for the task to end.
    pub async fn close(self) -> Option<PanelExit> {
        let PanelHandle { msg_tx, task, .. } = self;
        drop(msg_tx);
        task.await.ok()
    }

    /// Waits for the task to end without closing it from this side.
    pub async fn finished(self) -> Option<PanelExit> {
        self.task.await.ok()
    }
}

/// Starts a panel instance for `window_id`.
///
/// The panel announces itself on `port`, renders (cache-first unless
/// `force_refresh`), then reacts to UI messages, refresh broadcasts and close
/// instructions.
pub fn spawn_panel(
    window_id: WindowId,
    driver: PanelDriver,
    port: Port,
    bus: broadcast::Receiver<RuntimeMessage>,
    force_refresh: bool,
) -> PanelHandle {
    let (msg_tx, msg_rx) = mpsc::unbounded_channel();
    let (view_tx, views) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_panel(
        window_id,
        driver,
        port,
        bus,
        msg_rx,
        view_tx,
        force_refresh,
    ));
    PanelHandle {
        window_id,
        msg_tx,
        views,
        task,
    }
}

async fn run_panel(
    window_id: WindowId,
    mut driver: PanelDriver,
    mut port: Port,
    mut bus: broadcast::Receiver<RuntimeMessage>,
    mut msg_rx: mpsc::UnboundedReceiver<Msg>,
    view_tx: mpsc::UnboundedSender<PanelViewModel>,
    force_refresh: bool,
) -> PanelExit {
    let mut port_open = port.send(PortMessage::Init { window_id }).is_ok();
    if !port_open {
        nav_warn!("Panel for window {} could not reach the background", window_id);
    }
    let mut bus_open = true;
    let mut fetches = JoinSet::new();

    let pending = driver.apply(Msg::Opened { force_refresh }).await;
    publish(&mut driver, &view_tx, &mut fetches, pending);

    let exit = loop {
        tokio::select! {
            incoming = port.recv(), if port_open => match incoming {
                Some(PortMessage::ClosePanel) => break PanelExit::ClosedByBackground,
                Some(PortMessage::Init { .. }) => {}
                None => {
                    nav_debug!("Background channel closed for window {}", window_id);
                    port_open = false;
                }
            },
            signal = bus.recv(), if bus_open => match signal {
                Ok(RuntimeMessage::Refresh) | Err(RecvError::Lagged(_)) => {
                    let pending = driver.apply(Msg::RefreshBroadcast).await;
                    publish(&mut driver, &view_tx, &mut fetches, pending);
                }
                Err(RecvError::Closed) => bus_open = false,
            },
            ui = msg_rx.recv() => match ui {
                Some(msg) => {
                    let pending = driver.apply(msg).await;
                    publish(&mut driver, &view_tx, &mut fetches, pending);
                }
                None => break PanelExit::UserClosed,
            },
            Some(joined) = fetches.join_next(), if !fetches.is_empty() => match joined {
                Ok(outcome) => {
                    let pending = driver.complete(outcome).await;
                    publish(&mut driver, &view_tx, &mut fetches, pending);
                }
                Err(err) if err.is_cancelled() => {}
                Err(err) => {
                    nav_warn!("Snapshot fetch for window {} panicked: {}", window_id, err);
                    if fetches.is_empty() {
                        let pending = driver.apply(Msg::FetchFailed(err.to_string())).await;
                        publish(&mut driver, &view_tx, &mut fetches, pending);
                    }
                }
            },
        }
    };

    // Dropping the set aborts a fetch still in flight.
    drop(fetches);
    nav_info!("Panel for window {} ended: {:?}", window_id, exit);
    exit
}

/// Sends the view if it changed, then starts the requested fetch in place of
/// any older one.
fn publish(
    driver: &mut PanelDriver,
    view_tx: &mpsc::UnboundedSender<PanelViewModel>,
    fetches: &mut JoinSet<FetchOutcome>,
    pending: Option<PendingFetch>,
) {
    if let Some(view) = driver.take_view() {
        let _ = view_tx.send(view);
    }
    if let Some(fetch) = pending {
        fetches.abort_all();
        fetches.spawn(fetch.run());
    }
}
