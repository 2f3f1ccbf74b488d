//! Context menu derivation: root entry, one child per category, then the
//! fixed "open panel" action.

use crate::CachedSnapshot;

pub const ROOT_MENU_ID: &str = "navsync_root";
pub const SAVE_PREFIX: &str = "save_to_";
pub const OPEN_PANEL_ID: &str = "open_panel_action";
pub const SEPARATOR_ID: &str = "sep_1";
pub const FALLBACK_CATEGORY_ID: &str = "common";
pub const FALLBACK_CATEGORY_TITLE: &str = "Default category";
pub const ROOT_TITLE: &str = "Save to Navsync";
pub const OPEN_PANEL_TITLE: &str = "Open side panel";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntryKind {
    Normal,
    Separator,
}

/// One entry to create on the host's context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: String,
    pub parent_id: Option<String>,
    pub title: String,
    pub kind: MenuEntryKind,
}

impl MenuEntry {
    fn child(id: String, title: impl Into<String>) -> Self {
        Self {
            id,
            parent_id: Some(ROOT_MENU_ID.to_string()),
            title: title.into(),
            kind: MenuEntryKind::Normal,
        }
    }
}

/// What a clicked menu item asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    OpenPanel,
    SaveTo { category_id: String },
    Unknown,
}

impl MenuAction {
    pub fn parse(menu_item_id: &str) -> Self {
        if menu_item_id == OPEN_PANEL_ID {
            return MenuAction::OpenPanel;
        }
        match menu_item_id.strip_prefix(SAVE_PREFIX) {
            Some(category_id) if !category_id.is_empty() => MenuAction::SaveTo {
                category_id: category_id.to_string(),
            },
            _ => MenuAction::Unknown,
        }
    }
}

pub fn save_item_id(category_id: &str) -> String {
    format!("{SAVE_PREFIX}{category_id}")
}

/// Full menu for the given cache content, in creation order.
///
/// Categories keep snapshot order. An absent or category-less snapshot yields
/// a single fallback category so capture stays available.
pub fn build_menu(snapshot: Option<&CachedSnapshot>) -> Vec<MenuEntry> {
    let categories = snapshot.map(|s| s.categories.as_slice()).unwrap_or(&[]);
    let mut entries = Vec::with_capacity(categories.len() + 3);

    entries.push(MenuEntry {
        id: ROOT_MENU_ID.to_string(),
        parent_id: None,
        title: ROOT_TITLE.to_string(),
        kind: MenuEntryKind::Normal,
    });

    if categories.is_empty() {
        entries.push(MenuEntry::child(
            save_item_id(FALLBACK_CATEGORY_ID),
            FALLBACK_CATEGORY_TITLE,
        ));
    } else {
        entries.extend(
            categories
                .iter()
                .map(|cat| MenuEntry::child(save_item_id(&cat.id), cat.name.clone())),
        );
    }

    entries.push(MenuEntry {
        kind: MenuEntryKind::Separator,
        ..MenuEntry::child(SEPARATOR_ID.to_string(), "")
    });
    entries.push(MenuEntry::child(OPEN_PANEL_ID.to_string(), OPEN_PANEL_TITLE));
    entries
}
