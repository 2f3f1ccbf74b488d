use navsync_core::{
    update, CachedSnapshot, Category, EmptyState, Link, Msg, PanelState, UNCATEGORIZED_ID,
};
use pretty_assertions::assert_eq;

fn link(id: &str, title: &str, category_id: &str, description: Option<&str>) -> Link {
    Link {
        id: id.to_string(),
        title: title.to_string(),
        url: format!("https://{id}.example.org"),
        description: description.map(str::to_string),
        category_id: category_id.to_string(),
        icon: None,
        pinned: None,
        created_at: 0,
    }
}

fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn ready_state() -> PanelState {
    let snapshot = CachedSnapshot::new(
        vec![
            link("rust", "Rust Book", "dev", Some("The official guide")),
            link("tokio", "Tokio", "dev", None),
            link("news", "Hacker News", "read", Some("Tech news")),
            link("orphan", "Lost Page", "gone", None),
        ],
        vec![category("dev", "Development"), category("read", "Reading")],
    );
    let (state, _) = update(PanelState::new(), Msg::CacheRead(Some(snapshot)));
    state
}

fn section_ids(state: &PanelState) -> Vec<String> {
    state
        .view()
        .sections
        .iter()
        .map(|s| s.category_id.clone())
        .collect()
}

#[test]
fn sections_follow_category_order_with_orphans_last() {
    let state = ready_state();
    assert_eq!(
        section_ids(&state),
        vec!["dev".to_string(), "read".to_string(), UNCATEGORIZED_ID.to_string()]
    );
    assert!(state.view().sections.iter().all(|s| !s.expanded));
}

#[test]
fn query_matches_title_url_or_description_case_insensitively() {
    let (state, _) = update(ready_state(), Msg::QueryChanged("TECH".to_string()));
    let view = state.view();
    assert_eq!(view.sections.len(), 1);
    assert_eq!(view.sections[0].category_id, "read");
    assert_eq!(view.sections[0].links[0].id, "news");

    let (state, _) = update(state, Msg::QueryChanged("tokio.example".to_string()));
    let view = state.view();
    assert_eq!(view.sections.len(), 1);
    assert_eq!(view.sections[0].links[0].id, "tokio");
}

#[test]
fn active_query_forces_sections_open() {
    let (state, _) = update(ready_state(), Msg::QueryChanged("o".to_string()));
    let view = state.view();
    assert!(!view.sections.is_empty());
    assert!(view.sections.iter().all(|s| s.expanded));
}

#[test]
fn expand_state_survives_rerenders_and_queries() {
    let (state, _) = update(ready_state(), Msg::CategoryToggled("read".to_string()));
    let (state, _) = update(state, Msg::QueryChanged("rust".to_string()));
    let (state, _) = update(state, Msg::QueryChanged(String::new()));

    let view = state.view();
    let expanded: Vec<_> = view
        .sections
        .iter()
        .map(|s| (s.category_id.as_str(), s.expanded))
        .collect();
    assert_eq!(
        expanded,
        vec![("dev", false), ("read", true), (UNCATEGORIZED_ID, false)]
    );

    let (state, _) = update(state, Msg::CategoryToggled("read".to_string()));
    assert!(!state.is_expanded("read"));
}

#[test]
fn empty_states_distinguish_no_results_from_no_data() {
    let (state, _) = update(ready_state(), Msg::QueryChanged("zzz".to_string()));
    assert_eq!(state.view().empty, Some(EmptyState::NoResults));

    let (state, _) = update(
        PanelState::new(),
        Msg::CacheRead(Some(CachedSnapshot::default())),
    );
    assert_eq!(state.view().empty, Some(EmptyState::NoData));
}

#[test]
fn unchanged_query_does_not_mark_dirty() {
    let mut state = ready_state();
    assert!(state.consume_dirty());
    let (mut state, _) = update(state, Msg::QueryChanged(String::new()));
    assert!(!state.consume_dirty());
}
