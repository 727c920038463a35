// ── Device-side domain types ──
//
// Typed views of the RouterOS objects the rotation reads and writes.
// Produced from `gwrotate_api::models` by `convert`; MAC addresses are
// normalised to upper case so comparisons are case-insensitive.

use serde::Serialize;
use strum::{Display, EnumString};

/// Transport protocol of a managed block rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl Protocol {
    /// The protocol-appropriate `reject-with` response.
    pub fn reject_with(self) -> &'static str {
        match self {
            Self::Tcp => "tcp-reset",
            Self::Udp => "icmp-network-unreachable",
        }
    }
}

/// Action of a wireless access-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessAction {
    Accept,
    Reject,
    /// Any other action (`query-radius`, ...), kept verbatim.
    Other(String),
}

impl AccessAction {
    pub fn from_ros(value: &str) -> Self {
        match value {
            "accept" => Self::Accept,
            "reject" => Self::Reject,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_ros(&self) -> &str {
        match self {
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Other(other) => other,
        }
    }
}

/// An `/ip/address` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressObject {
    pub id: String,
    /// Address with prefix length, e.g. `10.0.5.55/24`.
    pub address: String,
    pub interface: String,
}

impl AddressObject {
    /// The prefix length suffix, defaulting to 24.
    pub fn prefix_len(&self) -> u8 {
        self.address
            .split_once('/')
            .and_then(|(_, len)| len.parse().ok())
            .unwrap_or(24)
    }
}

/// A DHCP server network definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DhcpNetwork {
    pub id: String,
    pub address: String,
    pub gateway: Option<String>,
    pub dns_server: Option<String>,
}

/// A firewall filter rule as read back from the router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterRule {
    pub id: String,
    pub chain: String,
    pub action: String,
    pub protocol: Option<Protocol>,
    pub dst_address: Option<String>,
    pub comment: Option<String>,
    pub disabled: bool,
}

/// A block rule to create in the `forward` chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlockRule {
    pub protocol: Protocol,
    pub dst_address: String,
    pub comment: String,
    /// `.id` of the anchor rule to insert in front of.
    pub place_before: String,
}

/// A wireless access-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessEntry {
    pub id: String,
    pub interface: Option<String>,
    /// Upper-case MAC; `None` for wildcard entries.
    pub mac: Option<String>,
    pub action: AccessAction,
}

/// A live client association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub id: String,
    pub interface: String,
    pub mac: String,
}
