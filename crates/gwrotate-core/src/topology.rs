// ── Topology resolution ──
//
// Read-only walk from the subnet outward:
//   address object → routed interface → bridge → radios
// plus the DHCP network and the firewall anchor the rotation will touch.
// Each step is fail-fast and independently callable.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{RotationConfig, Subnet};
use crate::device::DeviceApi;
use crate::error::{CoreError, TopologyStep};
use crate::model::{AddressObject, DhcpNetwork};

/// Interface name prefixes that identify radios.
pub const WIRELESS_PREFIXES: &[&str] = &["wlan", "wifi"];

/// Everything the rotation needs to know about the segment. Read-only
/// after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkTopology {
    /// The address object carrying the gateway on the routed interface.
    pub address: AddressObject,
    pub bridge: String,
    pub radios: Vec<String>,
    pub dhcp: DhcpNetwork,
    /// `.id` of the placeholder rule block rules are inserted before.
    pub anchor_id: String,
}

impl NetworkTopology {
    /// Name of the routed interface.
    pub fn interface(&self) -> &str {
        &self.address.interface
    }
}

fn fail(step: TopologyStep, message: String) -> CoreError {
    CoreError::Topology { step, message }
}

/// Resolve every step in order, stopping at the first failure.
pub async fn resolve<D: DeviceApi>(
    device: &D,
    config: &RotationConfig,
) -> Result<NetworkTopology, CoreError> {
    let subnet = config.subnet();
    let address = resolve_interface(device, &subnet).await?;
    let bridge = resolve_bridge(device, &address.interface).await?;
    let radios = resolve_radios(device, &bridge).await?;
    let dhcp = resolve_dhcp_network(device, &subnet).await?;
    let anchor_id = resolve_anchor(device, config.anchor_comment()).await?;

    info!(
        interface = %address.interface,
        bridge = %bridge,
        radios = ?radios,
        "topology resolved"
    );

    Ok(NetworkTopology {
        address,
        bridge,
        radios,
        dhcp,
        anchor_id,
    })
}

/// Step 1: the address object whose network is `<subnet>.0`.
pub async fn resolve_interface<D: DeviceApi>(
    device: &D,
    subnet: &Subnet,
) -> Result<AddressObject, CoreError> {
    let network = subnet.network();
    let mut addresses = device.addresses_on_network(&network).await?;
    if addresses.len() > 1 {
        warn!(
            network = %network,
            count = addresses.len(),
            "several addresses on network, using the first"
        );
    }
    if addresses.is_empty() {
        return Err(fail(
            TopologyStep::Interface,
            format!("no interface for network {network}"),
        ));
    }
    let address = addresses.swap_remove(0);
    debug!(interface = %address.interface, address = %address.address, "routed interface");
    Ok(address)
}

/// Step 2: the bridge owning the routed interface.
///
/// A VLAN resolves to its parent bridge; a bridge carrying the address
/// directly resolves to itself.
pub async fn resolve_bridge<D: DeviceApi>(device: &D, interface: &str) -> Result<String, CoreError> {
    if let Some(parent) = device.vlan_parent(interface).await? {
        if device.bridge_exists(&parent).await? {
            debug!(interface, bridge = %parent, "VLAN parent bridge");
            return Ok(parent);
        }
        return Err(fail(
            TopologyStep::Bridge,
            format!("VLAN {interface} rides on {parent}, which is not a bridge"),
        ));
    }
    if device.bridge_exists(interface).await? {
        debug!(interface, "routed interface is itself a bridge");
        return Ok(interface.to_owned());
    }
    Err(fail(
        TopologyStep::Bridge,
        format!("no bridge owns interface {interface}"),
    ))
}

/// Step 3: bridge members that look like radios.
pub async fn resolve_radios<D: DeviceApi>(device: &D, bridge: &str) -> Result<Vec<String>, CoreError> {
    let members = device.bridge_members(bridge).await?;
    let mut radios: Vec<String> = Vec::new();
    for member in members {
        if is_radio_name(&member) && !radios.contains(&member) {
            radios.push(member);
        }
    }
    if radios.is_empty() {
        return Err(fail(
            TopologyStep::Radios,
            format!(
                "no wireless interfaces ({}*) are ports of bridge {bridge}",
                WIRELESS_PREFIXES.join("*, ")
            ),
        ));
    }
    Ok(radios)
}

/// `true` if `name` uses a recognised wireless interface prefix.
pub fn is_radio_name(name: &str) -> bool {
    WIRELESS_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Step 4: the DHCP network serving `<subnet>.0/24`, with a gateway set.
pub async fn resolve_dhcp_network<D: DeviceApi>(
    device: &D,
    subnet: &Subnet,
) -> Result<DhcpNetwork, CoreError> {
    let cidr = subnet.cidr();
    let network = device
        .dhcp_networks(&cidr)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| fail(TopologyStep::DhcpNetwork, format!("no DHCP network for {cidr}")))?;
    if network.gateway.is_none() {
        return Err(fail(
            TopologyStep::DhcpNetwork,
            format!("DHCP network {cidr} has no gateway configured"),
        ));
    }
    debug!(gateway = ?network.gateway, dns = ?network.dns_server, "DHCP network");
    Ok(network)
}

/// Step 5: the placeholder rule the block rules are positioned against.
pub async fn resolve_anchor<D: DeviceApi>(device: &D, comment: &str) -> Result<String, CoreError> {
    let rule = device.filter_rules(comment).await?.into_iter().next();
    match rule {
        Some(rule) => Ok(rule.id),
        None => Err(fail(
            TopologyStep::FirewallAnchor,
            format!(
                "no firewall rule with comment \"{comment}\". Create a disabled placeholder \
                 where the block rules belong, e.g.\n  /ip firewall filter add chain=forward \
                 action=passthrough disabled=yes comment=\"{comment}\"\nthen move it below \
                 any rules that must keep priority."
            ),
        )),
    }
}
