// Wireless endpoints (`/interface/wifi` or `/interface/wifiwave2`)
//
// Radio enable/disable, access-list reads and action updates, and
// registration-table kicks.

use serde_json::json;
use tracing::debug;

use crate::client::RouterOsClient;
use crate::error::Error;
use crate::models::{AccessListEntry, RegistrationEntry, WifiInterface};

impl RouterOsClient {
    /// Look up a radio by name.
    ///
    /// `GET /rest/interface/wifi?name={name}`
    pub async fn get_radio(&self, name: &str) -> Result<Option<WifiInterface>, Error> {
        debug!(name, "looking up radio");
        let radios: Vec<WifiInterface> = self
            .list(self.wireless_menu().path(), &[("name", name)])
            .await?;
        Ok(radios.into_iter().next())
    }

    /// Enable or disable a radio by `.id`.
    ///
    /// `PATCH /rest/interface/wifi/{id}` with `{"disabled": "true"|"false"}`
    pub async fn set_radio_disabled(&self, id: &str, disabled: bool) -> Result<(), Error> {
        debug!(id, disabled, "toggling radio");
        let value = if disabled { "true" } else { "false" };
        self.patch(self.wireless_menu().path(), id, &json!({ "disabled": value }))
            .await
    }

    /// List access-list entries scoped to a radio.
    ///
    /// `GET /rest/interface/wifi/access-list?interface={radio}`
    pub async fn list_access_list(&self, radio: &str) -> Result<Vec<AccessListEntry>, Error> {
        debug!(radio, "listing access list");
        let menu = format!("{}/access-list", self.wireless_menu().path());
        self.list(&menu, &[("interface", radio)]).await
    }

    /// Set the action (`accept` / `reject`) of an access-list entry.
    ///
    /// `PATCH /rest/interface/wifi/access-list/{id}`
    pub async fn set_access_list_action(&self, id: &str, action: &str) -> Result<(), Error> {
        debug!(id, action, "setting access-list action");
        let menu = format!("{}/access-list", self.wireless_menu().path());
        self.patch(&menu, id, &json!({ "action": action })).await
    }

    /// List the clients currently associated with a radio.
    ///
    /// `GET /rest/interface/wifi/registration-table?interface={radio}`
    pub async fn list_registrations(&self, radio: &str) -> Result<Vec<RegistrationEntry>, Error> {
        debug!(radio, "listing registration table");
        let menu = format!("{}/registration-table", self.wireless_menu().path());
        self.list(&menu, &[("interface", radio)]).await
    }

    /// Drop a client association.
    ///
    /// `DELETE /rest/interface/wifi/registration-table/{id}`
    pub async fn remove_registration(&self, id: &str) -> Result<(), Error> {
        debug!(id, "removing registration");
        let menu = format!("{}/registration-table", self.wireless_menu().path());
        self.delete(&menu, id).await
    }
}
