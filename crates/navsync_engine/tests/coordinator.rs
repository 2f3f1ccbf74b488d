use std::sync::Arc;

use navsync_engine::{connect, Activation, PanelCoordinator, PortMessage};
use pretty_assertions::assert_eq;

mod common;
use common::{eventually, within, FakeHost};

#[tokio::test]
async fn activation_without_binding_opens_a_panel() {
    let host = Arc::new(FakeHost::default());
    let coordinator = PanelCoordinator::new(host.clone());

    assert_eq!(coordinator.on_activation_signal(3).await, Activation::Opened);
    assert_eq!(host.opened(), vec![3]);
}

#[tokio::test]
async fn activation_with_live_binding_closes_instead_of_opening() {
    let host = Arc::new(FakeHost::default());
    let coordinator = PanelCoordinator::new(host.clone());
    let (background_end, mut panel_end) = connect();
    coordinator.on_panel_announce(3, background_end.sender());

    assert_eq!(coordinator.on_activation_signal(3).await, Activation::Closed);
    assert_eq!(within(panel_end.recv()).await, Some(PortMessage::ClosePanel));
    assert!(host.opened().is_empty());
}

#[tokio::test]
async fn stale_binding_is_dropped_and_a_panel_opened() {
    let host = Arc::new(FakeHost::default());
    let coordinator = PanelCoordinator::new(host.clone());
    let (background_end, panel_end) = connect();
    coordinator.on_panel_announce(3, background_end.sender());
    drop(panel_end);

    assert_eq!(coordinator.on_activation_signal(3).await, Activation::Reopened);
    assert!(!coordinator.has_binding(3));
    assert_eq!(host.opened(), vec![3]);
}

#[tokio::test]
async fn open_failure_is_swallowed() {
    let host = Arc::new(FakeHost {
        reject_open: true,
        ..FakeHost::default()
    });
    let coordinator = PanelCoordinator::new(host.clone());

    assert_eq!(coordinator.on_activation_signal(9).await, Activation::Opened);
    assert_eq!(host.opened(), vec![9]);
}

#[test]
fn newer_binding_survives_disconnect_of_the_old_one() {
    let coordinator = PanelCoordinator::new(Arc::new(FakeHost::default()));
    let (old, _old_panel) = connect();
    let (new, _new_panel) = connect();

    coordinator.on_panel_announce(5, old.sender());
    let replaced = coordinator.on_panel_announce(5, new.sender()).unwrap();
    assert_eq!(replaced.id(), old.id());

    assert!(!coordinator.on_disconnect(5, old.id()));
    assert!(coordinator.has_binding(5));
    assert!(coordinator.on_disconnect(5, new.id()));
    assert_eq!(coordinator.binding_count(), 0);
}

#[test]
fn bindings_are_per_window() {
    let coordinator = PanelCoordinator::new(Arc::new(FakeHost::default()));
    let (first, _a) = connect();
    let (second, _b) = connect();

    coordinator.on_panel_announce(1, first.sender());
    coordinator.on_panel_announce(2, second.sender());
    assert_eq!(coordinator.binding_count(), 2);
}

#[tokio::test]
async fn served_connection_binds_on_init_and_unbinds_on_disconnect() {
    let coordinator = Arc::new(PanelCoordinator::new(Arc::new(FakeHost::default())));
    let (background_end, panel_end) = connect();
    let task = tokio::spawn(coordinator.clone().serve(background_end));

    panel_end.send(PortMessage::Init { window_id: 11 }).unwrap();
    assert!(eventually(|| coordinator.has_binding(11)).await);

    drop(panel_end);
    within(task).await.unwrap();
    assert!(!coordinator.has_binding(11));
}
