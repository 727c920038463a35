// ── Firewall block rules ──
//
// Keeps exactly one TCP and one UDP reject rule in the `forward` chain under
// the managed comment tag, all pointing at the retired gateway. Repeated
// upserts with the same destination leave the rule set unchanged. A tagged
// rule that is disabled, or sits outside `forward`/`reject`, blocks nothing:
// it is removed and a working rule takes its place before the anchor.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::convert::{BLOCK_ACTION, BLOCK_CHAIN};
use crate::device::DeviceApi;
use crate::error::CoreError;
use crate::model::{FilterRule, NewBlockRule, Protocol};

/// What happened to the rule for one protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "kebab-case")]
pub enum RuleChange {
    Created { id: String },
    Repointed { id: String, previous: Option<String> },
    Unchanged { id: String },
}

impl RuleChange {
    pub fn id(&self) -> &str {
        match self {
            Self::Created { id } | Self::Repointed { id, .. } | Self::Unchanged { id } => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirewallOutcome {
    pub tcp: RuleChange,
    pub udp: RuleChange,
    /// Ids of surplus rules removed under the tag.
    pub removed_duplicates: Vec<String>,
    /// Ids of tagged rules removed because they were disabled or not a
    /// forward-chain reject.
    pub removed_inactive: Vec<String>,
}

/// Whether a rule actually rejects forwarded traffic.
fn is_active_block(rule: &FilterRule) -> bool {
    !rule.disabled && rule.chain == BLOCK_CHAIN && rule.action == BLOCK_ACTION
}

#[derive(Default)]
struct Removed {
    duplicates: Vec<String>,
    inactive: Vec<String>,
}

/// Ensure the TCP/UDP pair under `comment` targets `retired`.
///
/// Missing rules are created immediately before `anchor_id`.
pub async fn ensure_block_rules<D: DeviceApi>(
    device: &D,
    comment: &str,
    anchor_id: &str,
    retired: &str,
) -> Result<FirewallOutcome, CoreError> {
    let rules = device.filter_rules(comment).await?;
    let mut removed = Removed::default();

    let tcp = ensure_rule(
        device,
        &rules,
        Protocol::Tcp,
        comment,
        anchor_id,
        retired,
        &mut removed,
    )
    .await?;
    let udp = ensure_rule(
        device,
        &rules,
        Protocol::Udp,
        comment,
        anchor_id,
        retired,
        &mut removed,
    )
    .await?;

    info!(
        tcp = tcp.id(),
        udp = udp.id(),
        duplicates = removed.duplicates.len(),
        inactive = removed.inactive.len(),
        dst = retired,
        "block rules in place"
    );

    Ok(FirewallOutcome {
        tcp,
        udp,
        removed_duplicates: removed.duplicates,
        removed_inactive: removed.inactive,
    })
}

async fn ensure_rule<D: DeviceApi>(
    device: &D,
    rules: &[FilterRule],
    protocol: Protocol,
    comment: &str,
    anchor_id: &str,
    retired: &str,
    removed: &mut Removed,
) -> Result<RuleChange, CoreError> {
    let (active, inactive): (Vec<&FilterRule>, Vec<&FilterRule>) = rules
        .iter()
        .filter(|r| r.protocol == Some(protocol))
        .partition(|r| is_active_block(r));

    for rule in inactive {
        warn!(
            %protocol,
            id = %rule.id,
            chain = %rule.chain,
            action = %rule.action,
            disabled = rule.disabled,
            "removing inactive block rule"
        );
        device.remove_rule(&rule.id).await?;
        removed.inactive.push(rule.id.clone());
    }

    let mut matching = active.into_iter();

    let Some(first) = matching.next() else {
        let id = device
            .add_block_rule(&NewBlockRule {
                protocol,
                dst_address: retired.to_owned(),
                comment: comment.to_owned(),
                place_before: anchor_id.to_owned(),
            })
            .await?;
        debug!(%protocol, id = %id, "block rule created");
        return Ok(RuleChange::Created { id });
    };

    for extra in matching {
        warn!(%protocol, id = %extra.id, "removing duplicate block rule");
        device.remove_rule(&extra.id).await?;
        removed.duplicates.push(extra.id.clone());
    }

    if first.dst_address.as_deref() == Some(retired) {
        return Ok(RuleChange::Unchanged {
            id: first.id.clone(),
        });
    }

    device.set_rule_destination(&first.id, retired).await?;
    debug!(%protocol, id = %first.id, previous = ?first.dst_address, "block rule repointed");
    Ok(RuleChange::Repointed {
        id: first.id.clone(),
        previous: first.dst_address.clone(),
    })
}
