#![allow(clippy::unwrap_used)]
// End-to-end rotation runs against the in-memory router.

mod support;

use gwrotate_core::{CoreError, RandomOctets, Rotator, TopologyStep};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;

use support::{FakeRouter, Scripted, config, raw_config};

#[tokio::test(start_paused = true)]
async fn rotates_gateway_within_bounds() {
    let router = FakeRouter::segment();
    let config = config();
    let accepted_before = router.accepted();
    let rotator = Rotator::new(&router, &router, &config, Uuid::new_v4());

    let mut source = RandomOctets::new(StdRng::seed_from_u64(42));
    let report = rotator.run(&mut source).await.unwrap();

    let new = &report.plan.gateway.new;
    let last: u8 = new.strip_prefix("10.0.5.").unwrap().parse().unwrap();
    assert!((50..=60).contains(&last));
    assert_ne!(last, 55);

    let state = router.snapshot();
    assert_eq!(state.addresses[0].0.address, format!("{new}/24"));
    assert_eq!(state.dhcp[0].gateway.as_deref(), Some(new.as_str()));
    assert_eq!(state.dhcp[0].dns_server.as_deref(), Some(new.as_str()));

    let rules = router.block_rules();
    assert_eq!(rules.len(), 2);
    assert!(rules.iter().all(|r| r.dst_address.as_deref() == Some("10.0.5.55")));

    assert_eq!(router.accepted(), accepted_before);
    assert!(router.radio_enabled("wlan1"));
    assert!(router.radio_enabled("wifi2"));
    assert!(report.restore.is_clean());
    assert_eq!(report.restore.restored(), 2);
    assert!(router.sent.borrow().is_empty());
}

#[tokio::test(start_paused = true)]
async fn block_rules_are_placed_before_anchor() {
    let router = FakeRouter::segment();
    let config = config();
    let rotator = Rotator::new(&router, &router, &config, Uuid::new_v4());

    rotator.run(&mut Scripted::new(&[57])).await.unwrap();

    let ids: Vec<String> = router.snapshot().rules.iter().map(|r| r.id.clone()).collect();
    let anchor = ids.iter().position(|id| id == "*R2").unwrap();
    let keep = ids.iter().position(|id| id == "*R1").unwrap();
    assert_eq!(anchor, ids.len() - 1);
    assert_eq!(keep, 0);
    assert_eq!(ids.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn foreign_dns_server_is_left_alone() {
    let router = FakeRouter::segment();
    router.state.borrow_mut().dhcp[0].dns_server = Some("1.1.1.1".into());
    let config = config();
    let rotator = Rotator::new(&router, &router, &config, Uuid::new_v4());

    rotator.run(&mut Scripted::new(&[51])).await.unwrap();

    let dhcp = &router.snapshot().dhcp[0];
    assert_eq!(dhcp.gateway.as_deref(), Some("10.0.5.51"));
    assert_eq!(dhcp.dns_server.as_deref(), Some("1.1.1.1"));
}

#[tokio::test(start_paused = true)]
async fn no_radios_aborts_without_mutation() {
    let router = FakeRouter::segment();
    router
        .state
        .borrow_mut()
        .ports
        .retain(|(_, member)| !member.starts_with("wlan") && !member.starts_with("wifi"));
    let before = router.snapshot();
    let config = config();
    let rotator = Rotator::new(&router, &router, &config, Uuid::new_v4());

    let err = rotator.run(&mut Scripted::new(&[57])).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Topology {
            step: TopologyStep::Radios,
            ..
        }
    ));
    assert!(err.is_preflight());
    assert!(router.writes().is_empty());
    assert_eq!(router.snapshot().access, before.access);
    assert_eq!(router.snapshot().rules, before.rules);

    let sent = router.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ops@example.net");
    assert!(sent[0].subject.starts_with("[gwrotate]"));
}

#[tokio::test(start_paused = true)]
async fn exhausted_gateway_draws_abort_without_mutation() {
    let router = FakeRouter::segment();
    let config = config();
    let rotator = Rotator::new(&router, &router, &config, Uuid::new_v4());

    let err = rotator.run(&mut Scripted::new(&[55; 6])).await.unwrap_err();

    assert!(matches!(err, CoreError::GatewayExhausted { attempts: 6, .. }));
    assert!(router.writes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn plan_reads_but_never_writes() {
    let router = FakeRouter::segment();
    let config = config();
    let rotator = Rotator::new(&router, &router, &config, Uuid::new_v4());

    let plan = rotator.plan(&mut Scripted::new(&[55, 58])).await.unwrap();

    assert_eq!(plan.gateway.current, "10.0.5.55");
    assert_eq!(plan.gateway.new, "10.0.5.58");
    assert_eq!(plan.topology.bridge, "bridge1");
    assert_eq!(plan.topology.radios, vec!["wlan1", "wifi2"]);
    assert_eq!(plan.topology.anchor_id, "*R2");
    assert!(router.writes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn mid_run_failure_still_restores_radios() {
    let router = FakeRouter::segment();
    router.fail_on("set_dhcp_network");
    let accepted_before = router.accepted();
    let config = config();
    let rotator = Rotator::new(&router, &router, &config, Uuid::new_v4());

    let err = rotator.run(&mut Scripted::new(&[57])).await.unwrap_err();

    assert!(matches!(err, CoreError::Device { .. }));
    assert!(router.radio_enabled("wlan1"));
    assert!(router.radio_enabled("wifi2"));
    assert_eq!(router.accepted(), accepted_before);

    let sent = router.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].subject.contains("rotation failed"));
}

#[tokio::test(start_paused = true)]
async fn vanished_entry_is_reported_and_notified() {
    let router = FakeRouter::segment();
    router
        .state
        .borrow_mut()
        .vanish_on_enable
        .push("AA:00:00:00:00:03".into());
    let config = config();
    let rotator = Rotator::new(&router, &router, &config, Uuid::new_v4());

    let report = rotator.run(&mut Scripted::new(&[57])).await.unwrap();

    assert_eq!(report.restore.restored(), 1);
    assert_eq!(report.restore.missing(), 1);
    assert!(!report.restore.is_clean());

    let sent = router.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("AA:00:00:00:00:03 on wifi2"));
}

#[tokio::test(start_paused = true)]
async fn failed_mail_does_not_change_outcome() {
    let router = FakeRouter::segment();
    *router.fail_mail.borrow_mut() = true;
    router.state.borrow_mut().bridges.clear();
    let config = config();
    let rotator = Rotator::new(&router, &router, &config, Uuid::new_v4());

    let err = rotator.run(&mut Scripted::new(&[57])).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Topology {
            step: TopologyStep::Bridge,
            ..
        }
    ));
}

#[tokio::test(start_paused = true)]
async fn missing_notify_targets_send_nothing() {
    let router = FakeRouter::segment();
    router.state.borrow_mut().dhcp.clear();
    let mut raw = raw_config();
    raw.notify_to = None;
    let config = raw.validate().unwrap();
    let rotator = Rotator::new(&router, &router, &config, Uuid::new_v4());

    let err = rotator.run(&mut Scripted::new(&[57])).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Topology {
            step: TopologyStep::DhcpNetwork,
            ..
        }
    ));
    assert!(router.sent.borrow().is_empty());
}

#[tokio::test(start_paused = true)]
async fn second_run_repoints_existing_rules() {
    let router = FakeRouter::segment();
    let config = config();

    let first = Rotator::new(&router, &router, &config, Uuid::new_v4());
    first.run(&mut Scripted::new(&[57])).await.unwrap();

    let second = Rotator::new(&router, &router, &config, Uuid::new_v4());
    let report = second.run(&mut Scripted::new(&[57, 52])).await.unwrap();

    assert_eq!(report.plan.gateway.current, "10.0.5.57");
    assert_eq!(report.plan.gateway.new, "10.0.5.52");
    let rules = router.block_rules();
    assert_eq!(rules.len(), 2);
    assert!(rules.iter().all(|r| r.dst_address.as_deref() == Some("10.0.5.57")));
}
