//! Message channels between the background service and panel instances.
//!
//! A [`Port`] is one end of a connected pair. `recv` returning `None` is the
//! disconnect signal: the other end was dropped. Sending into a dropped end
//! fails with [`ChannelError::Closed`].

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::{broadcast, mpsc};

use crate::WindowId;

pub type ConnectionId = u64;

static NEXT_CONNECTION: AtomicU64 = AtomicU64::new(1);

const BUS_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortMessage {
    /// Panel announces which window it belongs to.
    Init { window_id: WindowId },
    /// Background asks the panel to close itself.
    ClosePanel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("channel closed")]
    Closed,
}

/// Sending half of a port, cheap to clone and store in tables.
#[derive(Debug, Clone)]
pub struct PortSender {
    id: ConnectionId,
    tx: mpsc::UnboundedSender<PortMessage>,
}

impl PortSender {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn send(&self, msg: PortMessage) -> Result<(), ChannelError> {
        self.tx.send(msg).map_err(|_| ChannelError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[derive(Debug)]
pub struct Port {
    sender: PortSender,
    rx: mpsc::UnboundedReceiver<PortMessage>,
}

impl Port {
    /// Identifier shared by both ends of the connection.
    pub fn id(&self) -> ConnectionId {
        self.sender.id
    }

    pub fn sender(&self) -> PortSender {
        self.sender.clone()
    }

    pub fn send(&self, msg: PortMessage) -> Result<(), ChannelError> {
        self.sender.send(msg)
    }

    /// Next message from the other end, or `None` once it disconnected.
    pub async fn recv(&mut self) -> Option<PortMessage> {
        self.rx.recv().await
    }
}

/// Opens a connected pair of ports.
pub fn connect() -> (Port, Port) {
    let id = NEXT_CONNECTION.fetch_add(1, Ordering::Relaxed);
    let (a_tx, a_rx) = mpsc::unbounded_channel();
    let (b_tx, b_rx) = mpsc::unbounded_channel();
    (
        Port {
            sender: PortSender { id, tx: b_tx },
            rx: a_rx,
        },
        Port {
            sender: PortSender { id, tx: a_tx },
            rx: b_rx,
        },
    )
}

/// Runtime-wide broadcast, received by every open panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeMessage {
    Refresh,
}

#[derive(Debug, Clone)]
pub struct RuntimeBus {
    tx: broadcast::Sender<RuntimeMessage>,
}

impl RuntimeBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RuntimeMessage> {
        self.tx.subscribe()
    }

    /// Best-effort delivery; returns how many listeners got the message.
    pub fn broadcast(&self, msg: RuntimeMessage) -> usize {
        self.tx.send(msg).unwrap_or(0)
    }
}

impl Default for RuntimeBus {
    fn default() -> Self {
        Self::new()
    }
}
