// ── Device-state interface ──
//
// The narrow set of reads and writes the rotation performs on the router.
// `RouterOsClient` implements it over REST (see `routeros`); tests use an
// in-memory router. Every method is one round trip; nothing is cached.

use crate::error::CoreError;
use crate::model::{
    AccessAction, AccessEntry, AddressObject, DhcpNetwork, FilterRule, NewBlockRule, Registration,
};

#[allow(async_fn_in_trait)]
pub trait DeviceApi {
    // ── Addressing ───────────────────────────────────────────────────

    /// Address objects whose network address equals `network`.
    async fn addresses_on_network(&self, network: &str) -> Result<Vec<AddressObject>, CoreError>;

    async fn set_address(&self, id: &str, address: &str) -> Result<(), CoreError>;

    // ── Interfaces ───────────────────────────────────────────────────

    /// Parent interface of the VLAN named `name`, if such a VLAN exists.
    async fn vlan_parent(&self, name: &str) -> Result<Option<String>, CoreError>;

    async fn bridge_exists(&self, name: &str) -> Result<bool, CoreError>;

    /// Member interface names of `bridge`, in port order.
    async fn bridge_members(&self, bridge: &str) -> Result<Vec<String>, CoreError>;

    // ── DHCP ─────────────────────────────────────────────────────────

    async fn dhcp_networks(&self, address: &str) -> Result<Vec<DhcpNetwork>, CoreError>;

    async fn set_dhcp_network(
        &self,
        id: &str,
        gateway: &str,
        dns_server: Option<&str>,
    ) -> Result<(), CoreError>;

    // ── Firewall ─────────────────────────────────────────────────────

    async fn filter_rules(&self, comment: &str) -> Result<Vec<FilterRule>, CoreError>;

    /// Create a block rule, returning its id.
    async fn add_block_rule(&self, rule: &NewBlockRule) -> Result<String, CoreError>;

    async fn set_rule_destination(&self, id: &str, dst_address: &str) -> Result<(), CoreError>;

    async fn remove_rule(&self, id: &str) -> Result<(), CoreError>;

    // ── Wireless ─────────────────────────────────────────────────────

    async fn set_radio_enabled(&self, radio: &str, enabled: bool) -> Result<(), CoreError>;

    async fn access_entries(&self, radio: &str) -> Result<Vec<AccessEntry>, CoreError>;

    async fn set_access_action(&self, id: &str, action: &AccessAction) -> Result<(), CoreError>;

    async fn registrations(&self, radio: &str) -> Result<Vec<Registration>, CoreError>;

    async fn remove_registration(&self, id: &str) -> Result<(), CoreError>;
}
