#![allow(clippy::unwrap_used)]
// Wi-Fi disable and restore phases against the in-memory router.

mod support;

use std::time::Duration;

use gwrotate_core::wifi::{disable_radios, restore_radios};
use gwrotate_core::{AcceptedEntry, AccessAction, ClientPermissionSnapshot, RestoreOutcome};

use support::{FakeRouter, access};

fn radios() -> Vec<String> {
    vec!["wlan1".into(), "wifi2".into()]
}

fn accepted(id: &str, mac: &str) -> AcceptedEntry {
    AcceptedEntry {
        id: id.into(),
        mac: mac.into(),
    }
}

fn action_of(router: &FakeRouter, id: &str) -> AccessAction {
    router
        .snapshot()
        .access
        .into_iter()
        .find(|e| e.id == id)
        .unwrap()
        .action
}

#[tokio::test]
async fn disable_snapshots_rejects_and_disconnects() {
    let router = FakeRouter::segment();
    let mut snapshot = ClientPermissionSnapshot::default();

    disable_radios(&router, &radios(), &mut snapshot).await.unwrap();

    assert_eq!(snapshot.accepted("wlan1"), [accepted("*W1", "AA:00:00:00:00:01")]);
    assert_eq!(snapshot.accepted("wifi2"), [accepted("*W3", "AA:00:00:00:00:03")]);
    assert_eq!(snapshot.len(), 2);
    assert!(!router.radio_enabled("wlan1"));
    assert!(!router.radio_enabled("wifi2"));

    let state = router.snapshot();
    assert!(
        state
            .access
            .iter()
            .filter(|e| e.mac.is_some())
            .all(|e| e.action == AccessAction::Reject)
    );
    assert!(state.registrations.is_empty());
}

#[tokio::test]
async fn disable_finishes_each_radio_before_the_next() {
    let router = FakeRouter::segment();
    let mut snapshot = ClientPermissionSnapshot::default();

    disable_radios(&router, &radios(), &mut snapshot).await.unwrap();

    let writes = router.writes();
    let wlan1_last = writes.iter().position(|w| w == "remove_registration *G1").unwrap();
    let wifi2_first = writes
        .iter()
        .position(|w| w == "set_radio_enabled wifi2 false")
        .unwrap();
    assert!(wlan1_last < wifi2_first);
}

#[tokio::test]
async fn partial_disable_keeps_captured_radios() {
    let router = FakeRouter::segment();
    router.fail_on("registrations");
    let mut snapshot = ClientPermissionSnapshot::default();

    assert!(disable_radios(&router, &radios(), &mut snapshot).await.is_err());
    assert_eq!(snapshot.radios().collect::<Vec<_>>(), vec!["wlan1"]);
}

#[tokio::test(start_paused = true)]
async fn restore_returns_accepted_set() {
    let router = FakeRouter::segment();
    let before = router.accepted();
    let mut snapshot = ClientPermissionSnapshot::default();
    disable_radios(&router, &radios(), &mut snapshot).await.unwrap();

    let report = restore_radios(&router, &snapshot, Duration::from_secs(30)).await;

    assert!(report.is_clean());
    assert_eq!(router.accepted(), before);
    assert!(report.problems().is_empty());
}

#[tokio::test(start_paused = true)]
async fn restore_waits_before_touching_access_list() {
    let router = FakeRouter::segment();
    let mut snapshot = ClientPermissionSnapshot::default();
    disable_radios(&router, &radios(), &mut snapshot).await.unwrap();

    let start = tokio::time::Instant::now();
    restore_radios(&router, &snapshot, Duration::from_secs(120)).await;
    assert!(start.elapsed() >= Duration::from_secs(120));
}

#[tokio::test(start_paused = true)]
async fn restore_failures_are_recorded_not_fatal() {
    let router = FakeRouter::segment();
    let mut snapshot = ClientPermissionSnapshot::default();
    disable_radios(&router, &radios(), &mut snapshot).await.unwrap();
    router.fail_on("set_access_action");

    let report = restore_radios(&router, &snapshot, Duration::from_secs(1)).await;

    assert_eq!(report.failed(), 2);
    assert!(
        report
            .entries
            .iter()
            .all(|e| matches!(e.outcome, RestoreOutcome::Failed(_)))
    );
    assert!(router.radio_enabled("wlan1"));
}

#[tokio::test(start_paused = true)]
async fn radio_that_will_not_come_back_is_reported() {
    let router = FakeRouter::segment();
    let mut snapshot = ClientPermissionSnapshot::default();
    disable_radios(&router, &radios(), &mut snapshot).await.unwrap();
    router.fail_on("enable_radio");

    let report = restore_radios(&router, &snapshot, Duration::from_secs(1)).await;

    assert_eq!(report.radio_errors.len(), 2);
    assert_eq!(report.restored(), 2);
    assert!(!report.is_clean());
}

#[tokio::test(start_paused = true)]
async fn restore_targets_the_entry_that_was_accepted() {
    let router = FakeRouter::segment();
    {
        let mut state = router.state.borrow_mut();
        // Same MAC twice on one radio: a reject ahead of the accept.
        state.access.insert(
            0,
            access("*W0", "wlan1", Some("AA:00:00:00:00:01"), AccessAction::Reject),
        );
    }
    let mut snapshot = ClientPermissionSnapshot::default();
    disable_radios(&router, &radios(), &mut snapshot).await.unwrap();

    let report = restore_radios(&router, &snapshot, Duration::from_secs(1)).await;

    assert!(report.is_clean());
    assert_eq!(action_of(&router, "*W1"), AccessAction::Accept);
    assert_eq!(action_of(&router, "*W0"), AccessAction::Reject);
}

#[tokio::test(start_paused = true)]
async fn recreated_entry_is_found_by_mac() {
    let router = FakeRouter::segment();
    let mut snapshot = ClientPermissionSnapshot::default();
    disable_radios(&router, &radios(), &mut snapshot).await.unwrap();
    {
        let mut state = router.state.borrow_mut();
        state.access.retain(|e| e.id != "*W1");
        state.access.push(access(
            "*W9",
            "wlan1",
            Some("aa:00:00:00:00:01"),
            AccessAction::Reject,
        ));
    }

    let report = restore_radios(&router, &snapshot, Duration::from_secs(1)).await;

    assert!(report.is_clean());
    assert_eq!(action_of(&router, "*W9"), AccessAction::Accept);
    assert_eq!(action_of(&router, "*W2"), AccessAction::Reject);
}
