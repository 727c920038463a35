// RouterOS REST API response types
//
// RouterOS reports every property as a string, including numbers and
// booleans ("true"/"false"). Item identifiers are `.id` values like `*1A`.
// Unknown properties are ignored so firmware upgrades don't break decoding.

use serde::{Deserialize, Deserializer, Serialize};

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct RouterOsError {
    pub error: Option<u16>,
    pub message: Option<String>,
    pub detail: Option<String>,
}

/// Reply of a `.../add` command: the id of the created item.
#[derive(Debug, Clone, Deserialize)]
pub struct AddReply {
    pub ret: String,
}

/// Decode a RouterOS `"true"`/`"false"` string (absent means `false`).
pub(crate) fn ros_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(matches!(raw.as_deref(), Some("true" | "yes")))
}

// ── /ip/address ─────────────────────────────────────────────────────

/// An entry of `/ip/address`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IpAddress {
    #[serde(rename = ".id")]
    pub id: String,
    /// Address with prefix length, e.g. `10.0.5.1/24`.
    pub address: String,
    /// Network address, e.g. `10.0.5.0`.
    pub network: String,
    pub interface: String,
    #[serde(default, deserialize_with = "ros_bool")]
    pub disabled: bool,
    #[serde(default, deserialize_with = "ros_bool")]
    pub dynamic: bool,
}

// ── /ip/dhcp-server/network ─────────────────────────────────────────

/// An entry of `/ip/dhcp-server/network`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DhcpNetwork {
    #[serde(rename = ".id")]
    pub id: String,
    /// Served network, e.g. `10.0.5.0/24`.
    pub address: String,
    pub gateway: Option<String>,
    #[serde(rename = "dns-server")]
    pub dns_server: Option<String>,
    pub comment: Option<String>,
}

// ── /interface ──────────────────────────────────────────────────────

/// An entry of `/interface/vlan`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VlanInterface {
    #[serde(rename = ".id")]
    pub id: String,
    pub name: String,
    /// Parent interface the VLAN rides on (usually a bridge).
    pub interface: String,
    #[serde(rename = "vlan-id")]
    pub vlan_id: Option<String>,
}

/// An entry of `/interface/bridge`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Bridge {
    #[serde(rename = ".id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "ros_bool")]
    pub disabled: bool,
}

/// An entry of `/interface/bridge/port`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BridgePort {
    #[serde(rename = ".id")]
    pub id: String,
    pub bridge: String,
    pub interface: String,
    #[serde(default, deserialize_with = "ros_bool")]
    pub disabled: bool,
}

// ── /ip/firewall/filter ─────────────────────────────────────────────

/// An entry of `/ip/firewall/filter`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilterRule {
    #[serde(rename = ".id")]
    pub id: String,
    pub chain: String,
    pub action: String,
    pub protocol: Option<String>,
    #[serde(rename = "dst-address")]
    pub dst_address: Option<String>,
    #[serde(rename = "reject-with")]
    pub reject_with: Option<String>,
    pub comment: Option<String>,
    #[serde(default, deserialize_with = "ros_bool")]
    pub disabled: bool,
}

/// Body of `/ip/firewall/filter/add`.
#[derive(Debug, Clone, Serialize)]
pub struct NewFilterRule {
    pub chain: String,
    pub action: String,
    pub protocol: String,
    #[serde(rename = "dst-address")]
    pub dst_address: String,
    #[serde(rename = "reject-with")]
    pub reject_with: String,
    pub comment: String,
    /// `.id` of the rule the new rule is inserted in front of.
    #[serde(rename = "place-before", skip_serializing_if = "Option::is_none")]
    pub place_before: Option<String>,
}

// ── /interface/wifi ─────────────────────────────────────────────────

/// An entry of `/interface/wifi`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WifiInterface {
    #[serde(rename = ".id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "ros_bool")]
    pub disabled: bool,
    #[serde(default, deserialize_with = "ros_bool")]
    pub running: bool,
}

/// An entry of `/interface/wifi/access-list`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccessListEntry {
    #[serde(rename = ".id")]
    pub id: String,
    /// Radio this rule is scoped to; absent means "any".
    pub interface: Option<String>,
    #[serde(rename = "mac-address")]
    pub mac_address: Option<String>,
    /// `accept`, `reject` or `query-radius`.
    pub action: String,
    pub comment: Option<String>,
}

/// An entry of `/interface/wifi/registration-table`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistrationEntry {
    #[serde(rename = ".id")]
    pub id: String,
    pub interface: String,
    #[serde(rename = "mac-address")]
    pub mac_address: String,
}

// ── /tool/e-mail ────────────────────────────────────────────────────

/// Body of `/tool/e-mail/send`. The SMTP server itself is configured
/// on the router under `/tool/e-mail`.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
    /// `yes` (implicit TLS) or `starttls`.
    pub tls: String,
}
