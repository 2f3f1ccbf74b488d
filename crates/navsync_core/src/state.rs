use std::collections::BTreeSet;

use crate::view_model::{build_view, PanelViewModel};
use crate::CachedSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelPhase {
    #[default]
    Init,
    Loading,
    Ready,
    Failed {
        message: String,
    },
}

/// State of one panel instance. Nothing here outlives the instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelState {
    phase: PanelPhase,
    snapshot: CachedSnapshot,
    query: String,
    expanded: BTreeSet<String>,
    dirty: bool,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> PanelViewModel {
        build_view(
            &self.phase,
            &self.snapshot,
            &self.query,
            &self.expanded,
            self.dirty,
        )
    }

    pub fn phase(&self) -> &PanelPhase {
        &self.phase
    }

    pub fn snapshot(&self) -> &CachedSnapshot {
        &self.snapshot
    }

    pub fn is_expanded(&self, category_id: &str) -> bool {
        self.expanded.contains(category_id)
    }

    /// Returns whether a re-render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn begin_loading(&mut self) {
        self.phase = PanelPhase::Loading;
        self.dirty = true;
    }

    pub(crate) fn apply_snapshot(&mut self, snapshot: CachedSnapshot) {
        self.snapshot = snapshot;
        self.phase = PanelPhase::Ready;
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.phase = PanelPhase::Failed { message };
        self.dirty = true;
    }

    pub(crate) fn set_query(&mut self, query: String) {
        if self.query != query {
            self.query = query;
            self.dirty = true;
        }
    }

    pub(crate) fn toggle_category(&mut self, category_id: String) {
        if !self.expanded.remove(&category_id) {
            self.expanded.insert(category_id);
        }
        self.dirty = true;
    }
}
