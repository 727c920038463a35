// /ip endpoints
//
// Address objects and DHCP server networks: the two places the segment's
// gateway lives.

use serde_json::json;
use tracing::debug;

use crate::client::RouterOsClient;
use crate::error::Error;
use crate::models::{DhcpNetwork, IpAddress};

const ADDRESS_MENU: &str = "ip/address";
const DHCP_NETWORK_MENU: &str = "ip/dhcp-server/network";

impl RouterOsClient {
    /// List address objects whose network address equals `network`.
    ///
    /// `GET /rest/ip/address?network={network}`
    pub async fn list_addresses_on_network(&self, network: &str) -> Result<Vec<IpAddress>, Error> {
        debug!(network, "listing addresses on network");
        self.list(ADDRESS_MENU, &[("network", network)]).await
    }

    /// Replace the address (with prefix length) of an address object.
    ///
    /// `PATCH /rest/ip/address/{id}` with `{"address": "..."}`
    pub async fn set_address(&self, id: &str, address: &str) -> Result<(), Error> {
        debug!(id, address, "setting address");
        self.patch(ADDRESS_MENU, id, &json!({ "address": address }))
            .await
    }

    /// List DHCP networks serving exactly `address` (e.g. `10.0.5.0/24`).
    ///
    /// `GET /rest/ip/dhcp-server/network?address={address}`
    pub async fn list_dhcp_networks(&self, address: &str) -> Result<Vec<DhcpNetwork>, Error> {
        debug!(address, "listing DHCP networks");
        self.list(DHCP_NETWORK_MENU, &[("address", address)]).await
    }

    /// Update the gateway, and optionally the DNS server, of a DHCP network.
    ///
    /// `PATCH /rest/ip/dhcp-server/network/{id}`
    pub async fn set_dhcp_network(
        &self,
        id: &str,
        gateway: &str,
        dns_server: Option<&str>,
    ) -> Result<(), Error> {
        debug!(id, gateway, ?dns_server, "updating DHCP network");
        let body = match dns_server {
            Some(dns) => json!({ "gateway": gateway, "dns-server": dns }),
            None => json!({ "gateway": gateway }),
        };
        self.patch(DHCP_NETWORK_MENU, id, &body).await
    }
}
