// In-memory router used by the rotation tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use gwrotate_core::{
    AccessAction, AccessEntry, AddressObject, CoreError, DeviceApi, DhcpNetwork, FilterRule,
    NewBlockRule, Notification, Notifier, OctetSource, Protocol, RawRotationConfig, Registration,
    RotationConfig,
};

pub const ANCHOR: &str = "gwrotate-anchor";
pub const TAG: &str = "gwrotate-block";

#[derive(Debug, Clone, Default)]
pub struct State {
    /// (address object, network address)
    pub addresses: Vec<(AddressObject, String)>,
    pub vlans: HashMap<String, String>,
    pub bridges: Vec<String>,
    /// (bridge, member)
    pub ports: Vec<(String, String)>,
    pub dhcp: Vec<DhcpNetwork>,
    pub rules: Vec<FilterRule>,
    /// (radio, enabled)
    pub radios: Vec<(String, bool)>,
    pub access: Vec<AccessEntry>,
    pub registrations: Vec<Registration>,
    /// MACs whose access-list entry disappears when their radio comes back.
    pub vanish_on_enable: Vec<String>,
    next_id: u32,
}

impl State {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        format!("*F{}", self.next_id)
    }
}

/// Fake router implementing [`DeviceApi`] and [`Notifier`].
#[derive(Debug, Default)]
pub struct FakeRouter {
    pub state: RefCell<State>,
    /// Every mutating call, in order.
    pub writes: RefCell<Vec<String>>,
    pub sent: RefCell<Vec<Notification>>,
    /// Name of a device method that fails when called.
    pub fail_on: RefCell<Option<&'static str>>,
    pub fail_mail: RefCell<bool>,
}

fn device_error(method: &str) -> CoreError {
    CoreError::Device {
        message: format!("injected failure in {method}"),
        status: Some(400),
    }
}

fn rule(id: &str, protocol: Option<Protocol>, dst: Option<&str>, comment: &str) -> FilterRule {
    FilterRule {
        id: id.into(),
        chain: "forward".into(),
        action: if protocol.is_some() { "reject" } else { "passthrough" }.into(),
        protocol,
        dst_address: dst.map(Into::into),
        comment: Some(comment.into()),
        disabled: protocol.is_none(),
    }
}

pub fn access(id: &str, radio: &str, mac: Option<&str>, action: AccessAction) -> AccessEntry {
    AccessEntry {
        id: id.into(),
        interface: Some(radio.into()),
        mac: mac.map(Into::into),
        action,
    }
}

impl FakeRouter {
    /// `10.0.5.0/24` on VLAN `vlan50` over `bridge1` with radios `wlan1`
    /// and `wifi2`, current gateway `10.0.5.55`.
    pub fn segment() -> Self {
        let mut s = State::default();
        s.addresses.push((
            AddressObject {
                id: "*A1".into(),
                address: "10.0.5.55/24".into(),
                interface: "vlan50".into(),
            },
            "10.0.5.0".into(),
        ));
        s.addresses.push((
            AddressObject {
                id: "*A2".into(),
                address: "192.168.88.1/24".into(),
                interface: "bridge1".into(),
            },
            "192.168.88.0".into(),
        ));
        s.vlans.insert("vlan50".into(), "bridge1".into());
        s.bridges.push("bridge1".into());
        for member in ["ether2", "vlan50", "wlan1", "wifi2"] {
            s.ports.push(("bridge1".into(), member.into()));
        }
        s.dhcp.push(DhcpNetwork {
            id: "*D1".into(),
            address: "10.0.5.0/24".into(),
            gateway: Some("10.0.5.55".into()),
            dns_server: Some("10.0.5.55".into()),
        });
        s.rules.push(rule("*R1", Some(Protocol::Tcp), Some("10.9.9.9"), "keep-me"));
        s.rules.push(rule("*R2", None, None, ANCHOR));
        s.radios.push(("wlan1".into(), true));
        s.radios.push(("wifi2".into(), true));
        s.access.push(access("*W1", "wlan1", Some("AA:00:00:00:00:01"), AccessAction::Accept));
        s.access.push(access("*W2", "wlan1", Some("AA:00:00:00:00:02"), AccessAction::Reject));
        s.access.push(access("*W3", "wifi2", Some("AA:00:00:00:00:03"), AccessAction::Accept));
        s.access.push(access("*W4", "wifi2", None, AccessAction::Accept));
        s.registrations.push(Registration {
            id: "*G1".into(),
            interface: "wlan1".into(),
            mac: "AA:00:00:00:00:01".into(),
        });
        s.registrations.push(Registration {
            id: "*G2".into(),
            interface: "wifi2".into(),
            mac: "AA:00:00:00:00:03".into(),
        });
        Self {
            state: RefCell::new(s),
            ..Self::default()
        }
    }

    pub fn fail_on(&self, method: &'static str) {
        *self.fail_on.borrow_mut() = Some(method);
    }

    fn check(&self, method: &str) -> Result<(), CoreError> {
        if *self.fail_on.borrow() == Some(method) {
            Err(device_error(method))
        } else {
            Ok(())
        }
    }

    fn write(&self, entry: String) {
        self.writes.borrow_mut().push(entry);
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    pub fn snapshot(&self) -> State {
        self.state.borrow().clone()
    }

    /// Accepted MACs per radio, as stored on the router.
    pub fn accepted(&self) -> Vec<(String, String)> {
        self.state
            .borrow()
            .access
            .iter()
            .filter(|e| e.action == AccessAction::Accept)
            .filter_map(|e| Some((e.interface.clone()?, e.mac.clone()?)))
            .collect()
    }

    pub fn block_rules(&self) -> Vec<FilterRule> {
        self.state
            .borrow()
            .rules
            .iter()
            .filter(|r| r.comment.as_deref() == Some(TAG))
            .cloned()
            .collect()
    }

    pub fn radio_enabled(&self, radio: &str) -> bool {
        self.state
            .borrow()
            .radios
            .iter()
            .any(|(name, enabled)| name == radio && *enabled)
    }
}

impl DeviceApi for FakeRouter {
    async fn addresses_on_network(&self, network: &str) -> Result<Vec<AddressObject>, CoreError> {
        self.check("addresses_on_network")?;
        Ok(self
            .state
            .borrow()
            .addresses
            .iter()
            .filter(|(_, net)| net == network)
            .map(|(a, _)| a.clone())
            .collect())
    }

    async fn set_address(&self, id: &str, address: &str) -> Result<(), CoreError> {
        self.check("set_address")?;
        self.write(format!("set_address {id} {address}"));
        let mut state = self.state.borrow_mut();
        let (entry, _) = state
            .addresses
            .iter_mut()
            .find(|(a, _)| a.id == id)
            .ok_or_else(|| CoreError::NotFound {
                entity: "address".into(),
                identifier: id.into(),
            })?;
        entry.address = address.into();
        Ok(())
    }

    async fn vlan_parent(&self, name: &str) -> Result<Option<String>, CoreError> {
        self.check("vlan_parent")?;
        Ok(self.state.borrow().vlans.get(name).cloned())
    }

    async fn bridge_exists(&self, name: &str) -> Result<bool, CoreError> {
        self.check("bridge_exists")?;
        Ok(self.state.borrow().bridges.iter().any(|b| b == name))
    }

    async fn bridge_members(&self, bridge: &str) -> Result<Vec<String>, CoreError> {
        self.check("bridge_members")?;
        Ok(self
            .state
            .borrow()
            .ports
            .iter()
            .filter(|(b, _)| b == bridge)
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn dhcp_networks(&self, address: &str) -> Result<Vec<DhcpNetwork>, CoreError> {
        self.check("dhcp_networks")?;
        Ok(self
            .state
            .borrow()
            .dhcp
            .iter()
            .filter(|n| n.address == address)
            .cloned()
            .collect())
    }

    async fn set_dhcp_network(
        &self,
        id: &str,
        gateway: &str,
        dns_server: Option<&str>,
    ) -> Result<(), CoreError> {
        self.check("set_dhcp_network")?;
        self.write(format!("set_dhcp_network {id} {gateway} {dns_server:?}"));
        let mut state = self.state.borrow_mut();
        let network = state.dhcp.iter_mut().find(|n| n.id == id).unwrap();
        network.gateway = Some(gateway.into());
        if let Some(dns) = dns_server {
            network.dns_server = Some(dns.into());
        }
        Ok(())
    }

    async fn filter_rules(&self, comment: &str) -> Result<Vec<FilterRule>, CoreError> {
        self.check("filter_rules")?;
        Ok(self
            .state
            .borrow()
            .rules
            .iter()
            .filter(|r| r.comment.as_deref() == Some(comment))
            .cloned()
            .collect())
    }

    async fn add_block_rule(&self, new: &NewBlockRule) -> Result<String, CoreError> {
        self.check("add_block_rule")?;
        self.write(format!("add_block_rule {} {}", new.protocol, new.dst_address));
        let mut state = self.state.borrow_mut();
        let id = state.next_id();
        let position = state
            .rules
            .iter()
            .position(|r| r.id == new.place_before)
            .ok_or_else(|| CoreError::NotFound {
                entity: "rule".into(),
                identifier: new.place_before.clone(),
            })?;
        state.rules.insert(
            position,
            rule(&id, Some(new.protocol), Some(&new.dst_address), &new.comment),
        );
        Ok(id)
    }

    async fn set_rule_destination(&self, id: &str, dst_address: &str) -> Result<(), CoreError> {
        self.check("set_rule_destination")?;
        self.write(format!("set_rule_destination {id} {dst_address}"));
        let mut state = self.state.borrow_mut();
        let rule = state.rules.iter_mut().find(|r| r.id == id).unwrap();
        rule.dst_address = Some(dst_address.into());
        Ok(())
    }

    async fn remove_rule(&self, id: &str) -> Result<(), CoreError> {
        self.check("remove_rule")?;
        self.write(format!("remove_rule {id}"));
        self.state.borrow_mut().rules.retain(|r| r.id != id);
        Ok(())
    }

    async fn set_radio_enabled(&self, radio: &str, enabled: bool) -> Result<(), CoreError> {
        self.check(if enabled { "enable_radio" } else { "disable_radio" })?;
        self.write(format!("set_radio_enabled {radio} {enabled}"));
        let mut state = self.state.borrow_mut();
        let entry = state
            .radios
            .iter_mut()
            .find(|(name, _)| name == radio)
            .ok_or_else(|| CoreError::NotFound {
                entity: "radio".into(),
                identifier: radio.into(),
            })?;
        entry.1 = enabled;
        if enabled {
            let vanish = state.vanish_on_enable.clone();
            state.access.retain(|e| {
                !(e.interface.as_deref() == Some(radio)
                    && e.mac.as_ref().is_some_and(|m| vanish.contains(m)))
            });
        }
        Ok(())
    }

    async fn access_entries(&self, radio: &str) -> Result<Vec<AccessEntry>, CoreError> {
        self.check("access_entries")?;
        Ok(self
            .state
            .borrow()
            .access
            .iter()
            .filter(|e| e.interface.as_deref() == Some(radio))
            .cloned()
            .collect())
    }

    async fn set_access_action(&self, id: &str, action: &AccessAction) -> Result<(), CoreError> {
        self.check("set_access_action")?;
        self.write(format!("set_access_action {id} {}", action.as_ros()));
        let mut state = self.state.borrow_mut();
        let entry = state.access.iter_mut().find(|e| e.id == id).unwrap();
        entry.action = action.clone();
        Ok(())
    }

    async fn registrations(&self, radio: &str) -> Result<Vec<Registration>, CoreError> {
        self.check("registrations")?;
        Ok(self
            .state
            .borrow()
            .registrations
            .iter()
            .filter(|r| r.interface == radio)
            .cloned()
            .collect())
    }

    async fn remove_registration(&self, id: &str) -> Result<(), CoreError> {
        self.check("remove_registration")?;
        self.write(format!("remove_registration {id}"));
        let mut state = self.state.borrow_mut();
        let before = state.registrations.len();
        state.registrations.retain(|r| r.id != id);
        if state.registrations.len() == before {
            return Err(CoreError::NotFound {
                entity: "registration".into(),
                identifier: id.into(),
            });
        }
        Ok(())
    }
}

impl Notifier for FakeRouter {
    async fn send(&self, notification: &Notification) -> Result<(), CoreError> {
        if *self.fail_mail.borrow() {
            return Err(device_error("send"));
        }
        self.sent.borrow_mut().push(notification.clone());
        Ok(())
    }
}

/// Replays a fixed sequence of draws.
pub struct Scripted(pub VecDeque<u8>);

impl Scripted {
    pub fn new(draws: &[u8]) -> Self {
        Self(draws.iter().copied().collect())
    }
}

impl OctetSource for Scripted {
    fn draw(&mut self, _low: u8, _high: u8) -> u8 {
        self.0.pop_front().unwrap()
    }
}

pub fn raw_config() -> RawRotationConfig {
    RawRotationConfig {
        subnet: "10.0.5".into(),
        low: 50,
        high: 60,
        max_attempts: 5,
        reconnect_delay: "30s".into(),
        notify_to: Some("ops@example.net".into()),
        notify_from: Some("router@example.net".into()),
        rule_comment: TAG.into(),
        anchor_comment: ANCHOR.into(),
    }
}

pub fn config() -> RotationConfig {
    raw_config().validate().unwrap()
}
