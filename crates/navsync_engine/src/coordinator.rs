//! Tracks which windows have an open panel and turns activation signals
//! (toolbar click or keyboard shortcut) into open/close toggles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use navsync_logging::{nav_debug, nav_error, nav_info, nav_warn};

use crate::channel::{ConnectionId, Port, PortMessage, PortSender};
use crate::host::HostPlatform;
use crate::WindowId;

/// What one activation signal did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// A close instruction was delivered to the bound panel.
    Closed,
    /// No binding existed; the host was asked to open a panel.
    Opened,
    /// The binding was stale; it was dropped and a panel was opened instead.
    Reopened,
}

pub struct PanelCoordinator {
    bindings: Mutex<HashMap<WindowId, PortSender>>,
    host: Arc<dyn HostPlatform>,
}

impl PanelCoordinator {
    pub fn new(host: Arc<dyn HostPlatform>) -> Self {
        Self {
            bindings: Mutex::new(HashMap::new()),
            host,
        }
    }

    /// Binds `channel` to `window_id`, returning the binding it replaced.
    pub fn on_panel_announce(&self, window_id: WindowId, channel: PortSender) -> Option<PortSender> {
        nav_debug!("Panel announced window={} conn={}", window_id, channel.id());
        self.lock().insert(window_id, channel)
    }

    /// Removes the binding for `window_id` only if it still belongs to
    /// `connection`; a superseded connection leaves the newer binding alone.
    pub fn on_disconnect(&self, window_id: WindowId, connection: ConnectionId) -> bool {
        let mut bindings = self.lock();
        match bindings.get(&window_id) {
            Some(current) if current.id() == connection => {
                bindings.remove(&window_id);
                nav_debug!("Panel disconnected window={} conn={}", window_id, connection);
                true
            }
            _ => false,
        }
    }

    pub async fn on_activation_signal(&self, window_id: WindowId) -> Activation {
        let bound = self.lock().get(&window_id).cloned();

        let activation = match bound {
            Some(channel) => match channel.send(PortMessage::ClosePanel) {
                Ok(()) => {
                    nav_info!("Closing panel for window {}", window_id);
                    return Activation::Closed;
                }
                Err(err) => {
                    nav_warn!("Panel channel for window {} is stale ({}), reopening", window_id, err);
                    self.on_disconnect(window_id, channel.id());
                    Activation::Reopened
                }
            },
            None => Activation::Opened,
        };

        if let Err(err) = self.host.open_panel(window_id).await {
            nav_error!("Failed to open panel for window {}: {}", window_id, err);
        }
        activation
    }

    pub fn has_binding(&self, window_id: WindowId) -> bool {
        self.lock().contains_key(&window_id)
    }

    pub fn binding_count(&self) -> usize {
        self.lock().len()
    }

    /// Serves one incoming panel connection until it disconnects.
    pub async fn serve(self: Arc<Self>, mut port: Port) {
        let connection = port.id();
        let mut announced = Vec::new();

        while let Some(msg) = port.recv().await {
            match msg {
                PortMessage::Init { window_id } => {
                    self.on_panel_announce(window_id, port.sender());
                    if !announced.contains(&window_id) {
                        announced.push(window_id);
                    }
                }
                PortMessage::ClosePanel => {
                    nav_debug!("Ignoring unexpected close message on conn={}", connection);
                }
            }
        }

        for window_id in announced {
            self.on_disconnect(window_id, connection);
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<WindowId, PortSender>> {
        self.bindings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
