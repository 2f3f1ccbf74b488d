use std::sync::Arc;

use navsync_logging::nav_info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cache::LocalCache;
use crate::capture::{CaptureClient, CaptureInvocation, CaptureOutcome};
use crate::channel::{connect, RuntimeBus};
use crate::coordinator::{Activation, PanelCoordinator};
use crate::host::{HostPlatform, MenuHost};
use crate::menu::ContextMenuSynchronizer;
use crate::panel::{spawn_panel, PanelDriver, PanelHandle};
use crate::remote::LinkStore;
use crate::WindowId;

/// The long-lived background side: owns the cache, the runtime bus, the
/// panel coordinator and the menu synchronizer task.
pub struct BackgroundService {
    cache: LocalCache,
    store: Arc<dyn LinkStore>,
    bus: RuntimeBus,
    coordinator: Arc<PanelCoordinator>,
    capture: CaptureClient,
    cancel: CancellationToken,
    menu_task: JoinHandle<()>,
}

impl BackgroundService {
    /// Must be called from within a tokio runtime.
    pub fn start(
        cache: LocalCache,
        store: Arc<dyn LinkStore>,
        host: Arc<dyn HostPlatform>,
        menus: Arc<dyn MenuHost>,
    ) -> Self {
        let bus = RuntimeBus::new();
        let cancel = CancellationToken::new();
        let synchronizer = ContextMenuSynchronizer::new(cache.clone(), menus);
        let menu_task = tokio::spawn(synchronizer.run(cancel.child_token()));
        nav_info!("Background service started");

        Self {
            coordinator: Arc::new(PanelCoordinator::new(host.clone())),
            capture: CaptureClient::new(store.clone(), host, bus.clone()),
            cache,
            store,
            bus,
            cancel,
            menu_task,
        }
    }

    /// Toolbar click or keyboard shortcut in `window_id`.
    pub async fn activate(&self, window_id: WindowId) -> Activation {
        self.coordinator.on_activation_signal(window_id).await
    }

    pub async fn menu_clicked(&self, invocation: &CaptureInvocation) -> CaptureOutcome {
        self.capture.capture(invocation).await
    }

    /// Starts a panel instance in `window_id`, connected to this service.
    pub fn open_panel(&self, window_id: WindowId, force_refresh: bool) -> PanelHandle {
        let (background_end, panel_end) = connect();
        tokio::spawn(self.coordinator.clone().serve(background_end));
        let driver = PanelDriver::new(self.cache.clone(), self.store.clone());
        spawn_panel(
            window_id,
            driver,
            panel_end,
            self.bus.subscribe(),
            force_refresh,
        )
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    pub fn bus(&self) -> &RuntimeBus {
        &self.bus
    }

    pub fn coordinator(&self) -> &Arc<PanelCoordinator> {
        &self.coordinator
    }

    /// Stops the menu synchronizer and waits for it.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.menu_task.await;
        nav_info!("Background service stopped");
    }
}
