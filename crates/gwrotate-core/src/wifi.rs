// ── Wi-Fi access control ──
//
// Disable phase: per radio, snapshot accepted entries, disable the radio,
// reject every MAC entry, and drop live associations.
// Restore phase: re-enable radios, wait, and set snapshot entries back to
// accept. Entries are found by id; an entry recreated under a new id is
// found by MAC. Restore never aborts; every entry gets an outcome.

use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::device::DeviceApi;
use crate::error::CoreError;
use crate::model::{AccessAction, AccessEntry};

/// An access-list entry that held `accept` before the disruption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptedEntry {
    pub id: String,
    /// Upper-case MAC.
    pub mac: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RadioSnapshot {
    accepted: Vec<AcceptedEntry>,
    /// Every MAC entry id present at capture time, whatever its action.
    seen: Vec<String>,
}

/// Per-radio entries that held `accept` before the disruption.
///
/// A radio is recorded before it is disabled, so the snapshot also tells
/// the restore phase which radios were touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientPermissionSnapshot {
    radios: IndexMap<String, RadioSnapshot>,
}

impl ClientPermissionSnapshot {
    /// Radios in processing order.
    pub fn radios(&self) -> impl Iterator<Item = &str> {
        self.radios.keys().map(String::as_str)
    }

    /// Accepted entries captured for `radio`.
    pub fn accepted(&self, radio: &str) -> &[AcceptedEntry] {
        self.radios.get(radio).map_or(&[], |r| r.accepted.as_slice())
    }

    /// Total number of captured entries across radios.
    pub fn len(&self) -> usize {
        self.radios.values().map(|r| r.accepted.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn seen(&self, radio: &str) -> &[String] {
        self.radios.get(radio).map_or(&[], |r| r.seen.as_slice())
    }

    fn record(&mut self, radio: &str, snapshot: RadioSnapshot) {
        self.radios.insert(radio.to_owned(), snapshot);
    }
}

/// Disable every radio in turn, completing each before the next.
///
/// On error the snapshot holds everything captured so far, so the caller
/// can still restore the radios already touched.
pub async fn disable_radios<D: DeviceApi>(
    device: &D,
    radios: &[String],
    snapshot: &mut ClientPermissionSnapshot,
) -> Result<(), CoreError> {
    for radio in radios {
        disable_radio(device, radio, snapshot).await?;
    }
    info!(radios = radios.len(), accepted = snapshot.len(), "radios disabled");
    Ok(())
}

async fn disable_radio<D: DeviceApi>(
    device: &D,
    radio: &str,
    snapshot: &mut ClientPermissionSnapshot,
) -> Result<(), CoreError> {
    let entries = device.access_entries(radio).await?;

    let mut captured = RadioSnapshot::default();
    for entry in &entries {
        let Some(mac) = &entry.mac else { continue };
        captured.seen.push(entry.id.clone());
        if entry.action == AccessAction::Accept {
            captured.accepted.push(AcceptedEntry {
                id: entry.id.clone(),
                mac: mac.clone(),
            });
        }
    }
    debug!(radio, accepted = captured.accepted.len(), "captured accepted clients");
    snapshot.record(radio, captured);

    device.set_radio_enabled(radio, false).await?;

    for entry in entries.iter().filter(|e| e.mac.is_some()) {
        if entry.action != AccessAction::Reject {
            device.set_access_action(&entry.id, &AccessAction::Reject).await?;
        }
    }

    for registration in device.registrations(radio).await? {
        match device.remove_registration(&registration.id).await {
            Ok(()) => debug!(radio, mac = %registration.mac, "client disconnected"),
            // Already gone once the radio went down.
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

// ── Restore ──────────────────────────────────────────────────────────

/// What happened to one snapshot entry during restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "error", rename_all = "kebab-case")]
pub enum RestoreOutcome {
    Restored,
    /// The access-list entry vanished during the rotation window.
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreEntry {
    pub radio: String,
    pub mac: String,
    pub outcome: RestoreOutcome,
}

/// Outcome of the restore phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    pub entries: Vec<RestoreEntry>,
    /// Radios that could not be re-enabled, with the error.
    pub radio_errors: Vec<(String, String)>,
}

impl RestoreReport {
    pub fn restored(&self) -> usize {
        self.count(|o| matches!(o, RestoreOutcome::Restored))
    }

    pub fn missing(&self) -> usize {
        self.count(|o| matches!(o, RestoreOutcome::Missing))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RestoreOutcome::Failed(_)))
    }

    /// Every radio came back and every entry was restored.
    pub fn is_clean(&self) -> bool {
        self.radio_errors.is_empty() && self.restored() == self.entries.len()
    }

    fn count(&self, pred: impl Fn(&RestoreOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }

    /// Human-readable list of everything that did not restore.
    pub fn problems(&self) -> Vec<String> {
        let radios = self
            .radio_errors
            .iter()
            .map(|(radio, err)| format!("radio {radio} not re-enabled: {err}"));
        let entries = self.entries.iter().filter_map(|e| match &e.outcome {
            RestoreOutcome::Restored => None,
            RestoreOutcome::Missing => Some(format!(
                "{} on {}: access-list entry missing",
                e.mac, e.radio
            )),
            RestoreOutcome::Failed(err) => Some(format!("{} on {}: {err}", e.mac, e.radio)),
        });
        radios.chain(entries).collect()
    }
}

/// Re-enable every snapshot radio, wait `settle`, then restore accepted MACs.
pub async fn restore_radios<D: DeviceApi>(
    device: &D,
    snapshot: &ClientPermissionSnapshot,
    settle: Duration,
) -> RestoreReport {
    let mut report = RestoreReport::default();

    for radio in snapshot.radios() {
        if let Err(e) = device.set_radio_enabled(radio, true).await {
            warn!(radio, error = %e, "failed to re-enable radio");
            report.radio_errors.push((radio.to_owned(), e.to_string()));
        }
    }

    debug!(?settle, "waiting for clients to re-associate");
    tokio::time::sleep(settle).await;

    for radio in snapshot.radios() {
        restore_radio(
            device,
            radio,
            snapshot.accepted(radio),
            snapshot.seen(radio),
            &mut report,
        )
        .await;
    }

    info!(
        restored = report.restored(),
        missing = report.missing(),
        failed = report.failed(),
        "client permissions restored"
    );
    report
}

async fn restore_radio<D: DeviceApi>(
    device: &D,
    radio: &str,
    accepted: &[AcceptedEntry],
    seen: &[String],
    report: &mut RestoreReport,
) {
    if accepted.is_empty() {
        return;
    }

    let entries = match device.access_entries(radio).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(radio, error = %e, "cannot read access list, skipping radio");
            for captured in accepted {
                report.entries.push(RestoreEntry {
                    radio: radio.to_owned(),
                    mac: captured.mac.clone(),
                    outcome: RestoreOutcome::Failed(e.to_string()),
                });
            }
            return;
        }
    };

    let mut claimed: Vec<&str> = Vec::new();
    for captured in accepted {
        let mac = &captured.mac;
        let same_mac = |e: &&AccessEntry| {
            e.mac
                .as_deref()
                .is_some_and(|m| m.eq_ignore_ascii_case(mac))
        };
        // A MAC match only counts for entries created after the snapshot;
        // anything seen at capture time and not accepted stays rejected.
        let entry = entries
            .iter()
            .filter(same_mac)
            .find(|e| e.id == captured.id)
            .or_else(|| {
                entries
                    .iter()
                    .filter(same_mac)
                    .find(|e| !seen.contains(&e.id) && !claimed.contains(&e.id.as_str()))
            });
        if let Some(entry) = entry {
            claimed.push(&entry.id);
        }

        let outcome = match entry {
            None => {
                warn!(radio, mac = %mac, "access-list entry disappeared, not restored");
                RestoreOutcome::Missing
            }
            Some(entry) => match device.set_access_action(&entry.id, &AccessAction::Accept).await {
                Ok(()) => {
                    debug!(radio, mac = %mac, "access restored");
                    RestoreOutcome::Restored
                }
                Err(e) => {
                    warn!(radio, mac = %mac, error = %e, "failed to restore access");
                    RestoreOutcome::Failed(e.to_string())
                }
            },
        };

        report.entries.push(RestoreEntry {
            radio: radio.to_owned(),
            mac: mac.clone(),
            outcome,
        });
    }
}
