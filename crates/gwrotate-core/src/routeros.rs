// ── RouterOS-backed device and notifier ──
//
// Connects `RouterConfig` to a `gwrotate_api::RouterOsClient` and
// implements the core traits on top of it.

use gwrotate_api::models::{EmailMessage, NewFilterRule};
use gwrotate_api::transport::{TlsMode, TransportConfig};
use gwrotate_api::WirelessMenu;
pub use gwrotate_api::RouterOsClient;
use tracing::debug;

use crate::config::{RouterConfig, TlsVerification, WirelessPackage};
use crate::device::DeviceApi;
use crate::error::CoreError;
use crate::model::{
    AccessAction, AccessEntry, AddressObject, DhcpNetwork, FilterRule, NewBlockRule, Registration,
};
use crate::notify::{Notification, Notifier};

/// Mail transport security for `/tool/e-mail/send`.
const MAIL_TLS: &str = "starttls";

fn build_transport(config: &RouterConfig) -> TransportConfig {
    TransportConfig {
        tls: match &config.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        },
        timeout: config.timeout,
    }
}

/// Build a REST client for the configured router. No request is sent.
pub fn connect(config: &RouterConfig) -> Result<RouterOsClient, CoreError> {
    let transport = build_transport(config);
    let client = RouterOsClient::new(
        config.url.clone(),
        config.username.clone(),
        config.password.clone(),
        &transport,
    )?;
    let menu = match config.wireless {
        WirelessPackage::Wifi => WirelessMenu::Wifi,
        WirelessPackage::Wifiwave2 => WirelessMenu::Wifiwave2,
    };
    debug!(url = %config.url, ?menu, "router client ready");
    Ok(client.with_wireless_menu(menu))
}

impl DeviceApi for RouterOsClient {
    async fn addresses_on_network(&self, network: &str) -> Result<Vec<AddressObject>, CoreError> {
        let addresses = self.list_addresses_on_network(network).await?;
        Ok(addresses
            .into_iter()
            .filter(|a| !a.disabled)
            .map(AddressObject::from)
            .collect())
    }

    async fn set_address(&self, id: &str, address: &str) -> Result<(), CoreError> {
        Ok(RouterOsClient::set_address(self, id, address).await?)
    }

    async fn vlan_parent(&self, name: &str) -> Result<Option<String>, CoreError> {
        Ok(self.get_vlan(name).await?.map(|v| v.interface))
    }

    async fn bridge_exists(&self, name: &str) -> Result<bool, CoreError> {
        Ok(self.get_bridge(name).await?.is_some())
    }

    async fn bridge_members(&self, bridge: &str) -> Result<Vec<String>, CoreError> {
        let ports = self.list_bridge_ports(bridge).await?;
        Ok(ports
            .into_iter()
            .filter(|p| !p.disabled)
            .map(|p| p.interface)
            .collect())
    }

    async fn dhcp_networks(&self, address: &str) -> Result<Vec<DhcpNetwork>, CoreError> {
        let networks = self.list_dhcp_networks(address).await?;
        Ok(networks.into_iter().map(DhcpNetwork::from).collect())
    }

    async fn set_dhcp_network(
        &self,
        id: &str,
        gateway: &str,
        dns_server: Option<&str>,
    ) -> Result<(), CoreError> {
        Ok(RouterOsClient::set_dhcp_network(self, id, gateway, dns_server).await?)
    }

    async fn filter_rules(&self, comment: &str) -> Result<Vec<FilterRule>, CoreError> {
        let rules = self.list_filter_rules_by_comment(comment).await?;
        Ok(rules.into_iter().map(FilterRule::from).collect())
    }

    async fn add_block_rule(&self, rule: &NewBlockRule) -> Result<String, CoreError> {
        Ok(self.add_filter_rule(&NewFilterRule::from(rule)).await?)
    }

    async fn set_rule_destination(&self, id: &str, dst_address: &str) -> Result<(), CoreError> {
        Ok(self.set_filter_dst_address(id, dst_address).await?)
    }

    async fn remove_rule(&self, id: &str) -> Result<(), CoreError> {
        Ok(self.remove_filter_rule(id).await?)
    }

    async fn set_radio_enabled(&self, radio: &str, enabled: bool) -> Result<(), CoreError> {
        let found = self
            .get_radio(radio)
            .await?
            .ok_or_else(|| CoreError::NotFound {
                entity: "radio".into(),
                identifier: radio.into(),
            })?;
        Ok(self.set_radio_disabled(&found.id, !enabled).await?)
    }

    async fn access_entries(&self, radio: &str) -> Result<Vec<AccessEntry>, CoreError> {
        let entries = self.list_access_list(radio).await?;
        Ok(entries.into_iter().map(AccessEntry::from).collect())
    }

    async fn set_access_action(&self, id: &str, action: &AccessAction) -> Result<(), CoreError> {
        Ok(self.set_access_list_action(id, action.as_ros()).await?)
    }

    async fn registrations(&self, radio: &str) -> Result<Vec<Registration>, CoreError> {
        let entries = self.list_registrations(radio).await?;
        Ok(entries.into_iter().map(Registration::from).collect())
    }

    async fn remove_registration(&self, id: &str) -> Result<(), CoreError> {
        Ok(RouterOsClient::remove_registration(self, id).await?)
    }
}

impl Notifier for RouterOsClient {
    async fn send(&self, notification: &Notification) -> Result<(), CoreError> {
        let message = EmailMessage {
            to: notification.to.clone(),
            from: notification.from.clone(),
            subject: notification.subject.clone(),
            body: notification.body.clone(),
            tls: MAIL_TLS.into(),
        };
        Ok(self.send_email(&message).await?)
    }
}
