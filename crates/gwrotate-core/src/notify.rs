// ── Failure notifications ──
//
// Best-effort reports to an operator mailbox. A failed send is logged and
// otherwise ignored; it never changes the outcome of a run.

use tracing::{debug, warn};

use crate::config::NotifyTargets;
use crate::error::CoreError;
use crate::validate::ValidationErrors;

const SUBJECT_PREFIX: &str = "[gwrotate]";

/// An outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

/// Message delivery over an encrypted transport.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn send(&self, notification: &Notification) -> Result<(), CoreError>;
}

/// Send a message if targets are configured, swallowing delivery errors.
pub async fn notify_best_effort<N: Notifier>(
    notifier: &N,
    targets: Option<&NotifyTargets>,
    subject: &str,
    body: String,
) {
    let Some(targets) = targets else {
        debug!(subject, "notification targets not configured, skipping");
        return;
    };

    let notification = Notification {
        to: targets.to.clone(),
        from: targets.from.clone(),
        subject: format!("{SUBJECT_PREFIX} {subject}"),
        body,
    };

    if let Err(e) = notifier.send(&notification).await {
        warn!(error = %e, to = %notification.to, "failed to send notification");
    }
}

/// Log every validation error indexed from 1 and send one consolidated report.
pub async fn report_validation_failure<N: Notifier>(
    notifier: &N,
    targets: Option<&NotifyTargets>,
    errors: &ValidationErrors,
) {
    for (i, err) in errors.iter().enumerate() {
        warn!(index = i + 1, "configuration error: {err}");
    }
    let body = format!(
        "Gateway rotation did not start: {} configuration error(s).\n\n{errors}",
        errors.len()
    );
    notify_best_effort(notifier, targets, "configuration invalid", body).await;
}
