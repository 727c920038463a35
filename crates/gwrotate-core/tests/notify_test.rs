#![allow(clippy::unwrap_used)]
// Validation failure reports through the in-memory router's mail tool.

mod support;

use gwrotate_core::ValidationErrors;
use gwrotate_core::notify::report_validation_failure;
use pretty_assertions::assert_eq;

use support::{FakeRouter, raw_config};

fn three_errors() -> ValidationErrors {
    let mut raw = raw_config();
    raw.subnet = "192.168".into();
    raw.low = 60;
    raw.high = 50;
    raw.reconnect_delay = "soon".into();
    let errors = raw.validate().unwrap_err();
    assert_eq!(errors.len(), 3);
    errors
}

#[tokio::test]
async fn one_report_lists_every_error() {
    let router = FakeRouter::segment();
    let targets = raw_config().notify_targets();
    assert!(targets.is_some());

    report_validation_failure(&router, targets.as_ref(), &three_errors()).await;

    let sent = router.sent.borrow();
    assert_eq!(sent.len(), 1);
    let mail = &sent[0];
    assert_eq!(mail.to, "ops@example.net");
    assert_eq!(mail.from, "router@example.net");
    assert!(mail.subject.contains("configuration invalid"));
    assert!(mail.body.contains("3 configuration error(s)"));
    for index in ["1. ", "2. ", "3. "] {
        assert!(mail.body.contains(index), "missing {index:?} in:\n{}", mail.body);
    }
    assert!(mail.body.contains("expected 3 octets, found 2"));
    assert!(mail.body.contains("reconnect delay 'soon'"));
}

#[tokio::test]
async fn nothing_is_sent_without_targets() {
    let router = FakeRouter::segment();
    let mut raw = raw_config();
    raw.notify_from = None;
    assert!(raw.notify_targets().is_none());

    report_validation_failure(&router, raw.notify_targets().as_ref(), &three_errors()).await;

    assert!(router.sent.borrow().is_empty());
}

#[tokio::test]
async fn failed_send_is_swallowed() {
    let router = FakeRouter::segment();
    *router.fail_mail.borrow_mut() = true;

    report_validation_failure(&router, raw_config().notify_targets().as_ref(), &three_errors())
        .await;

    assert!(router.sent.borrow().is_empty());
}
