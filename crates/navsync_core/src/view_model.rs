use std::collections::{BTreeSet, HashSet};

use crate::{CachedSnapshot, Link, PanelPhase};

/// Section id for links whose category is not in the snapshot.
pub const UNCATEGORIZED_ID: &str = "__uncategorized";
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// A query is active and nothing matched.
    NoResults,
    /// The snapshot holds nothing to show.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelViewModel {
    pub loading: bool,
    /// Set when the last fetch failed; the view offers a retry control.
    pub error: Option<String>,
    pub query: String,
    pub sections: Vec<CategorySection>,
    pub empty: Option<EmptyState>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySection {
    pub category_id: String,
    pub name: String,
    pub expanded: bool,
    pub links: Vec<LinkRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRow {
    pub id: String,
    pub title: String,
    pub url: String,
}

impl From<&Link> for LinkRow {
    fn from(link: &Link) -> Self {
        Self {
            id: link.id.clone(),
            title: link.title.clone(),
            url: link.url.clone(),
        }
    }
}

/// Case-insensitive substring match over title, URL and description.
/// `query_lower` must already be lowercased.
pub fn link_matches(link: &Link, query_lower: &str) -> bool {
    if query_lower.is_empty() {
        return true;
    }
    link.title.to_lowercase().contains(query_lower)
        || link.url.to_lowercase().contains(query_lower)
        || link
            .description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(query_lower))
}

pub(crate) fn build_view(
    phase: &PanelPhase,
    snapshot: &CachedSnapshot,
    query: &str,
    expanded: &BTreeSet<String>,
    dirty: bool,
) -> PanelViewModel {
    let mut view = PanelViewModel {
        loading: *phase == PanelPhase::Loading,
        query: query.to_string(),
        dirty,
        ..PanelViewModel::default()
    };

    match phase {
        PanelPhase::Init => return view,
        PanelPhase::Failed { message } => {
            view.error = Some(message.clone());
            return view;
        }
        PanelPhase::Loading | PanelPhase::Ready => {}
    }

    let query_lower = query.trim().to_lowercase();
    let searching = !query_lower.is_empty();
    let section = |category_id: &str, name: &str, links: Vec<LinkRow>| CategorySection {
        category_id: category_id.to_string(),
        name: name.to_string(),
        expanded: searching || expanded.contains(category_id),
        links,
    };

    for category in &snapshot.categories {
        let links: Vec<LinkRow> = snapshot
            .links
            .iter()
            .filter(|link| link.category_id == category.id && link_matches(link, &query_lower))
            .map(LinkRow::from)
            .collect();
        if !links.is_empty() {
            view.sections.push(section(&category.id, &category.name, links));
        }
    }

    let known: HashSet<&str> = snapshot.categories.iter().map(|c| c.id.as_str()).collect();
    let orphans: Vec<LinkRow> = snapshot
        .links
        .iter()
        .filter(|link| !known.contains(link.category_id.as_str()))
        .filter(|link| link_matches(link, &query_lower))
        .map(LinkRow::from)
        .collect();
    if !orphans.is_empty() {
        view.sections
            .push(section(UNCATEGORIZED_ID, UNCATEGORIZED_NAME, orphans));
    }

    if view.sections.is_empty() && !view.loading {
        view.empty = Some(if searching {
            EmptyState::NoResults
        } else {
            EmptyState::NoData
        });
    }
    view
}
