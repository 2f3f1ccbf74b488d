use std::sync::Arc;

use navsync_core::{resolve_target, CaptureRequest, MenuAction};
use navsync_logging::{nav_debug, nav_error, nav_info, nav_warn};

use crate::channel::{RuntimeBus, RuntimeMessage};
use crate::host::{HostPlatform, Notification};
use crate::remote::LinkStore;
use crate::{FailureKind, WindowId};

/// A context menu click, with what was under the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CaptureInvocation {
    pub window_id: WindowId,
    pub menu_item_id: String,
    /// Link under the cursor, if the click was on a link.
    pub link_url: Option<String>,
    pub page_url: Option<String>,
    pub page_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    PanelOpened,
    Saved(CaptureRequest),
    Failed(FailureKind),
    /// Not a capture entry (separator, root, foreign id).
    Ignored,
}

pub struct CaptureClient {
    store: Arc<dyn LinkStore>,
    host: Arc<dyn HostPlatform>,
    bus: RuntimeBus,
}

impl CaptureClient {
    pub fn new(store: Arc<dyn LinkStore>, host: Arc<dyn HostPlatform>, bus: RuntimeBus) -> Self {
        Self { store, host, bus }
    }

    pub async fn capture(&self, invocation: &CaptureInvocation) -> CaptureOutcome {
        let category_id = match MenuAction::parse(&invocation.menu_item_id) {
            MenuAction::OpenPanel => {
                if let Err(err) = self.host.open_panel(invocation.window_id).await {
                    nav_error!("Failed to open panel from menu: {}", err);
                }
                return CaptureOutcome::PanelOpened;
            }
            MenuAction::SaveTo { category_id } => category_id,
            MenuAction::Unknown => {
                nav_debug!("Ignoring menu item {}", invocation.menu_item_id);
                return CaptureOutcome::Ignored;
            }
        };

        if !self.store.is_configured() {
            return self.fail(
                FailureKind::Configuration,
                "No secret configured. Regenerate the extension or sign in from the panel.",
            );
        }

        let Some(target) = resolve_target(
            invocation.link_url.as_deref(),
            invocation.page_url.as_deref(),
        ) else {
            return self.fail(FailureKind::InvalidUrl, "Nothing to save on this page.");
        };

        let request = CaptureRequest::new(&category_id, target, invocation.page_title.as_deref());
        match self.store.create_link(&request).await {
            Ok(()) => {
                nav_info!("Saved {} to category {}", request.url, request.category_id);
                self.host.notify(Notification::success("Saved to Navsync"));
                let delivered = self.bus.broadcast(RuntimeMessage::Refresh);
                nav_debug!("Refresh broadcast reached {} panel(s)", delivered);
                CaptureOutcome::Saved(request)
            }
            Err(err) => {
                let message = match &err.kind {
                    FailureKind::HttpStatus(code) => format!("Server returned error: {code}"),
                    kind => format!("Request failed ({kind}). Check the network."),
                };
                nav_warn!("Capture of {} failed: {}", request.url, err);
                self.fail(err.kind, message)
            }
        }
    }

    fn fail(&self, kind: FailureKind, message: impl Into<String>) -> CaptureOutcome {
        self.host.notify(Notification::failure(kind.clone(), message));
        CaptureOutcome::Failed(kind)
    }
}
