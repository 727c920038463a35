// ── API-to-domain conversion ──
//
// Bridges raw `gwrotate_api` types into the core domain model.

use gwrotate_api::models as api;

use crate::model::{
    AccessAction, AccessEntry, AddressObject, DhcpNetwork, FilterRule, NewBlockRule, Registration,
};

/// Firewall chain the block rules live in.
pub(crate) const BLOCK_CHAIN: &str = "forward";
pub(crate) const BLOCK_ACTION: &str = "reject";

pub(crate) fn normalize_mac(mac: &str) -> String {
    mac.trim().to_ascii_uppercase()
}

impl From<api::IpAddress> for AddressObject {
    fn from(a: api::IpAddress) -> Self {
        Self {
            id: a.id,
            address: a.address,
            interface: a.interface,
        }
    }
}

impl From<api::DhcpNetwork> for DhcpNetwork {
    fn from(n: api::DhcpNetwork) -> Self {
        Self {
            id: n.id,
            address: n.address,
            gateway: n.gateway.filter(|g| !g.is_empty()),
            dns_server: n.dns_server.filter(|d| !d.is_empty()),
        }
    }
}

impl From<api::FilterRule> for FilterRule {
    fn from(r: api::FilterRule) -> Self {
        Self {
            id: r.id,
            chain: r.chain,
            action: r.action,
            protocol: r.protocol.as_deref().and_then(|p| p.parse().ok()),
            dst_address: r.dst_address,
            comment: r.comment,
            disabled: r.disabled,
        }
    }
}

impl From<&NewBlockRule> for api::NewFilterRule {
    fn from(rule: &NewBlockRule) -> Self {
        Self {
            chain: BLOCK_CHAIN.into(),
            action: BLOCK_ACTION.into(),
            protocol: rule.protocol.to_string(),
            dst_address: rule.dst_address.clone(),
            reject_with: rule.protocol.reject_with().into(),
            comment: rule.comment.clone(),
            place_before: Some(rule.place_before.clone()),
        }
    }
}

impl From<api::AccessListEntry> for AccessEntry {
    fn from(e: api::AccessListEntry) -> Self {
        Self {
            id: e.id,
            interface: e.interface,
            mac: e
                .mac_address
                .as_deref()
                .filter(|m| !m.is_empty())
                .map(normalize_mac),
            action: AccessAction::from_ros(&e.action),
        }
    }
}

impl From<api::RegistrationEntry> for Registration {
    fn from(r: api::RegistrationEntry) -> Self {
        Self {
            id: r.id,
            interface: r.interface,
            mac: normalize_mac(&r.mac_address),
        }
    }
}
