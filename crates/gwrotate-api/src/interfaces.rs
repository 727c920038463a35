// /interface endpoints
//
// Read-only lookups used to walk from a routed interface to its bridge
// and from the bridge to its member ports.

use tracing::debug;

use crate::client::RouterOsClient;
use crate::error::Error;
use crate::models::{Bridge, BridgePort, VlanInterface};

impl RouterOsClient {
    /// Look up a VLAN interface by name.
    ///
    /// `GET /rest/interface/vlan?name={name}`
    pub async fn get_vlan(&self, name: &str) -> Result<Option<VlanInterface>, Error> {
        debug!(name, "looking up VLAN interface");
        let vlans: Vec<VlanInterface> = self.list("interface/vlan", &[("name", name)]).await?;
        Ok(vlans.into_iter().next())
    }

    /// Look up a bridge by name.
    ///
    /// `GET /rest/interface/bridge?name={name}`
    pub async fn get_bridge(&self, name: &str) -> Result<Option<Bridge>, Error> {
        debug!(name, "looking up bridge");
        let bridges: Vec<Bridge> = self.list("interface/bridge", &[("name", name)]).await?;
        Ok(bridges.into_iter().next())
    }

    /// List the member ports of a bridge.
    ///
    /// `GET /rest/interface/bridge/port?bridge={bridge}`
    pub async fn list_bridge_ports(&self, bridge: &str) -> Result<Vec<BridgePort>, Error> {
        debug!(bridge, "listing bridge ports");
        self.list("interface/bridge/port", &[("bridge", bridge)])
            .await
    }
}
