// RouterOS REST API HTTP client
//
// Wraps `reqwest::Client` with RouterOS-specific URL construction, basic
// auth, and error-body decoding. Menu-specific endpoints (ip, interfaces,
// firewall, wireless, tool) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::RouterOsError;
use crate::transport::TransportConfig;

/// Which wireless package menu the router exposes.
///
/// RouterOS 7.13+ ships the `wifi` package; earlier 7.x releases on
/// 802.11ac hardware use `wifiwave2`. Both share the same access-list
/// and registration-table schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WirelessMenu {
    #[default]
    Wifi,
    Wifiwave2,
}

impl WirelessMenu {
    /// Menu path below `/rest`.
    pub fn path(self) -> &'static str {
        match self {
            Self::Wifi => "interface/wifi",
            Self::Wifiwave2 => "interface/wifiwave2",
        }
    }
}

/// Raw HTTP client for the RouterOS REST API.
///
/// Every method maps to exactly one REST call. RouterOS encodes all
/// property values as strings; the models in [`crate::models`] keep that
/// shape and leave typing to `gwrotate-core`.
pub struct RouterOsClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
    wireless: WirelessMenu,
}

impl RouterOsClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the router root (e.g. `https://192.168.88.1`); the
    /// `/rest` prefix is appended per request.
    pub fn new(
        base_url: Url,
        username: String,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, username, password))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        username: String,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            username,
            password,
            wireless: WirelessMenu::default(),
        }
    }

    /// Select the wireless package menu (defaults to `wifi`).
    pub fn with_wireless_menu(mut self, menu: WirelessMenu) -> Self {
        self.wireless = menu;
        self
    }

    /// The router base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured wireless menu.
    pub fn wireless_menu(&self) -> WirelessMenu {
        self.wireless
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/rest/{path}`.
    pub(crate) fn rest_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}/rest/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&full)?)
    }

    /// Build `{base}/rest/{menu}/{id}` for a single item.
    pub(crate) fn item_url(&self, menu: &str, id: &str) -> Result<Url, Error> {
        self.rest_url(&format!("{menu}/{id}"))
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// `GET` a menu listing, filtered by exact property matches.
    pub(crate) async fn list<T: DeserializeOwned>(
        &self,
        menu: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<T>, Error> {
        let mut url = self.rest_url(menu)?;
        if !filters.is_empty() {
            url.query_pairs_mut().extend_pairs(filters.iter().copied());
        }
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await?;

        self.parse_json(resp).await
    }

    /// `PATCH` properties on a single item.
    pub(crate) async fn patch(
        &self,
        menu: &str,
        id: &str,
        body: &impl Serialize,
    ) -> Result<(), Error> {
        let url = self.item_url(menu, id)?;
        debug!("PATCH {}", url);

        let resp = self
            .http
            .patch(url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .json(body)
            .send()
            .await?;

        self.parse_empty(resp).await
    }

    /// `POST` a console command (`{menu}/{command}`), e.g. `ip/firewall/filter/add`.
    pub(crate) async fn command<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, Error> {
        let url = self.rest_url(path)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .json(body)
            .send()
            .await?;

        self.parse_json(resp).await
    }

    /// `DELETE` a single item.
    pub(crate) async fn delete(&self, menu: &str, id: &str) -> Result<(), Error> {
        let url = self.item_url(menu, id)?;
        debug!("DELETE {}", url);

        let resp = self
            .http
            .delete(url)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await?;

        self.parse_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn parse_json<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let body = Self::check_status(resp).await?;
        trace!(body = %body, "response body");
        // Some commands reply with an empty body instead of `[]`.
        let text = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(text).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    async fn parse_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let body = Self::check_status(resp).await?;
        trace!(body = %body, "response body");
        Ok(())
    }

    /// Map non-success statuses into typed errors, returning the body text
    /// on success.
    async fn check_status(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let parsed: Option<RouterOsError> = serde_json::from_str(&body).ok();
        let message = parsed
            .as_ref()
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_owned());
        let detail = parsed.and_then(|e| e.detail);

        match status {
            reqwest::StatusCode::UNAUTHORIZED => Err(Error::Authentication { message }),
            reqwest::StatusCode::FORBIDDEN => Err(Error::PermissionDenied { message }),
            _ => Err(Error::RouterOs {
                status: status.as_u16(),
                message,
                detail,
            }),
        }
    }
}
