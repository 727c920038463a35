// /ip/firewall/filter endpoints
//
// Lookup by comment, positioned insert, in-place repoint, and removal.

use serde_json::json;
use tracing::debug;

use crate::client::RouterOsClient;
use crate::error::Error;
use crate::models::{AddReply, FilterRule, NewFilterRule};

const FILTER_MENU: &str = "ip/firewall/filter";

impl RouterOsClient {
    /// List filter rules carrying exactly `comment`.
    ///
    /// `GET /rest/ip/firewall/filter?comment={comment}`
    pub async fn list_filter_rules_by_comment(
        &self,
        comment: &str,
    ) -> Result<Vec<FilterRule>, Error> {
        debug!(comment, "listing filter rules by comment");
        self.list(FILTER_MENU, &[("comment", comment)]).await
    }

    /// Add a filter rule, returning the new rule's `.id`.
    ///
    /// `POST /rest/ip/firewall/filter/add` -- the command form is used
    /// instead of `PUT` because only it honours `place-before`.
    pub async fn add_filter_rule(&self, rule: &NewFilterRule) -> Result<String, Error> {
        debug!(
            protocol = %rule.protocol,
            dst = %rule.dst_address,
            place_before = ?rule.place_before,
            "adding filter rule"
        );
        let reply: AddReply = self.command(&format!("{FILTER_MENU}/add"), rule).await?;
        Ok(reply.ret)
    }

    /// Repoint the destination address of an existing rule.
    ///
    /// `PATCH /rest/ip/firewall/filter/{id}` with `{"dst-address": "..."}`
    pub async fn set_filter_dst_address(&self, id: &str, dst_address: &str) -> Result<(), Error> {
        debug!(id, dst_address, "repointing filter rule");
        self.patch(FILTER_MENU, id, &json!({ "dst-address": dst_address }))
            .await
    }

    /// Remove a filter rule.
    ///
    /// `DELETE /rest/ip/firewall/filter/{id}`
    pub async fn remove_filter_rule(&self, id: &str) -> Result<(), Error> {
        debug!(id, "removing filter rule");
        self.delete(FILTER_MENU, id).await
    }
}
