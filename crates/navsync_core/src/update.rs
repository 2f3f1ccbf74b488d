use crate::{Effect, Msg, PanelPhase, PanelState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PanelState, msg: Msg) -> (PanelState, Vec<Effect>) {
    let effects = match msg {
        Msg::Opened { force_refresh } => {
            if force_refresh {
                state.begin_loading();
                vec![Effect::FetchSnapshot]
            } else {
                vec![Effect::ReadCache]
            }
        }
        Msg::CacheRead(cached) => {
            // Only the initial read decides between hit and miss.
            if *state.phase() != PanelPhase::Init {
                return (state, Vec::new());
            }
            match cached {
                Some(snapshot) => {
                    state.apply_snapshot(snapshot);
                    Vec::new()
                }
                None => {
                    state.begin_loading();
                    vec![Effect::FetchSnapshot]
                }
            }
        }
        Msg::RefreshClicked | Msg::RefreshBroadcast => {
            state.begin_loading();
            vec![Effect::FetchSnapshot]
        }
        Msg::FetchSucceeded(snapshot) => {
            state.apply_snapshot(snapshot.clone());
            vec![Effect::WriteCache(snapshot)]
        }
        Msg::FetchFailed(message) => {
            state.fail(message);
            Vec::new()
        }
        Msg::QueryChanged(query) => {
            state.set_query(query);
            Vec::new()
        }
        Msg::CategoryToggled(category_id) => {
            state.toggle_category(category_id);
            Vec::new()
        }
    };

    (state, effects)
}
