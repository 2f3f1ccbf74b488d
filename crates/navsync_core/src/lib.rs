//! Navsync core: data model, menu and capture derivation, and the pure panel
//! state machine. No IO happens in this crate.
mod capture;
mod effect;
mod enrich;
mod menu;
mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use capture::{favicon_url, resolve_target, CaptureRequest, DEFAULT_CAPTURE_TITLE};
pub use effect::Effect;
pub use enrich::{working_set, EnrichmentProgress};
pub use menu::{
    build_menu, save_item_id, MenuAction, MenuEntry, MenuEntryKind, FALLBACK_CATEGORY_ID,
    FALLBACK_CATEGORY_TITLE, OPEN_PANEL_ID, ROOT_MENU_ID, SAVE_PREFIX, SEPARATOR_ID,
};
pub use model::{with_description, CachedSnapshot, Category, Link, SNAPSHOT_KEY};
pub use msg::Msg;
pub use state::{PanelPhase, PanelState};
pub use update::update;
pub use view_model::{
    link_matches, CategorySection, EmptyState, LinkRow, PanelViewModel, UNCATEGORIZED_ID,
    UNCATEGORIZED_NAME,
};
