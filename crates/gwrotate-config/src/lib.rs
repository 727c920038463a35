//! Configuration for the gwrotate binary.
//!
//! TOML file + `GWROTATE_*` environment layering, password resolution
//! (env + keyring + plaintext), and translation to the core's
//! `RouterConfig` and `RawRotationConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use gwrotate_core::{RawRotationConfig, RouterConfig, TlsVerification, WirelessPackage};

const ENV_PREFIX: &str = "GWROTATE_";
const PASSWORD_ENV: &str = "GWROTATE_PASSWORD";
const KEYRING_SERVICE: &str = "gwrotate";
const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for {username}@{host}")]
    NoCredentials { username: String, host: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub router: RouterSection,

    #[serde(default)]
    pub rotation: RotationSection,

    #[serde(default)]
    pub notify: NotifySection,
}

/// How to reach the router.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouterSection {
    /// REST base URL (e.g., "https://192.168.88.1").
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_username")]
    pub username: String,

    /// Plaintext password (prefer keyring or `GWROTATE_PASSWORD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Accept the router's self-signed certificate.
    #[serde(default = "default_insecure")]
    pub insecure: bool,

    /// Path to a CA certificate used when `insecure` is off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Wireless package: "wifi" or "wifiwave2".
    #[serde(default = "default_wireless")]
    pub wireless: String,
}

impl Default for RouterSection {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: default_username(),
            password: None,
            insecure: default_insecure(),
            ca_cert: None,
            timeout: default_timeout(),
            wireless: default_wireless(),
        }
    }
}

fn default_url() -> String {
    "https://192.168.88.1".into()
}
fn default_username() -> String {
    "gwrotate".into()
}
fn default_insecure() -> bool {
    true
}
fn default_timeout() -> u64 {
    30
}
fn default_wireless() -> String {
    "wifi".into()
}

/// Rotation tunables, unvalidated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RotationSection {
    #[serde(default)]
    pub subnet: String,

    #[serde(default = "default_low")]
    pub low: i64,

    #[serde(default = "default_high")]
    pub high: i64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: i64,

    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay: String,

    #[serde(default = "default_rule_comment")]
    pub rule_comment: String,

    #[serde(default = "default_anchor_comment")]
    pub anchor_comment: String,
}

impl Default for RotationSection {
    fn default() -> Self {
        Self {
            subnet: String::new(),
            low: default_low(),
            high: default_high(),
            max_attempts: default_max_attempts(),
            reconnect_delay: default_reconnect_delay(),
            rule_comment: default_rule_comment(),
            anchor_comment: default_anchor_comment(),
        }
    }
}

fn default_low() -> i64 {
    2
}
fn default_high() -> i64 {
    254
}
fn default_max_attempts() -> i64 {
    10
}
fn default_reconnect_delay() -> String {
    "30s".into()
}
fn default_rule_comment() -> String {
    "gwrotate-block".into()
}
fn default_anchor_comment() -> String {
    "gwrotate-anchor".into()
}

/// Failure report addresses. Both must be set for mail to go out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NotifySection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

/// Scheduler/CLI values layered over the file before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationOverrides {
    pub subnet: Option<String>,
    pub low: Option<i64>,
    pub high: Option<i64>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "gwrotate", "gwrotate")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("gwrotate");
    p
}

/// Default run lock location: the runtime dir, else the temp dir.
pub fn default_lock_path() -> PathBuf {
    project_dirs()
        .and_then(|dirs| dirs.runtime_dir().map(Path::to_path_buf))
        .unwrap_or_else(std::env::temp_dir)
        .join("gwrotate.lock")
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from defaults + file + environment.
///
/// Environment keys nest on `__`, e.g. `GWROTATE_ROTATION__SUBNET`.
/// A missing file is not an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config from a TOML string only, without file or environment.
pub fn parse_config(toml_str: &str) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::string(toml_str))
        .extract()?;
    Ok(config)
}

/// TOML rendering of `cfg` with the password masked.
pub fn render_redacted(cfg: &Config) -> Result<String, ConfigError> {
    let mut shown = cfg.clone();
    if shown.router.password.is_some() {
        shown.router.password = Some(REDACTED.into());
    }
    Ok(toml::to_string_pretty(&shown)?)
}

// ── Credential resolution ───────────────────────────────────────────

fn router_host(router: &RouterSection) -> String {
    url::Url::parse(&router.url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| router.url.clone())
}

/// Resolve the router password: env var, then keyring, then plaintext.
pub fn resolve_password(router: &RouterSection) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    let host = router_host(router);
    let account = format!("{}@{host}", router.username);
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &account) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = router.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        username: router.username.clone(),
        host,
    })
}

// ── Translation to core types ───────────────────────────────────────

/// Build a `RouterConfig`, resolving the password through the chain.
pub fn to_router_config(cfg: &Config) -> Result<RouterConfig, ConfigError> {
    let password = resolve_password(&cfg.router)?;
    router_config_with_password(&cfg.router, password)
}

/// Build a `RouterConfig` around an already-resolved password.
pub fn router_config_with_password(
    router: &RouterSection,
    password: SecretString,
) -> Result<RouterConfig, ConfigError> {
    let url: url::Url = router.url.parse().map_err(|_| ConfigError::Validation {
        field: "router.url".into(),
        reason: format!("invalid URL: {}", router.url),
    })?;

    let tls = if router.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = router.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let wireless = match router.wireless.as_str() {
        "wifi" => WirelessPackage::Wifi,
        "wifiwave2" => WirelessPackage::Wifiwave2,
        other => {
            return Err(ConfigError::Validation {
                field: "router.wireless".into(),
                reason: format!("expected 'wifi' or 'wifiwave2', got '{other}'"),
            });
        }
    };

    Ok(RouterConfig {
        url,
        username: router.username.clone(),
        password,
        tls,
        timeout: Duration::from_secs(router.timeout),
        wireless,
    })
}

/// Overlay `overrides` on the file values and hand them to the validator.
pub fn to_raw_rotation(cfg: &Config, overrides: &RotationOverrides) -> RawRotationConfig {
    let rotation = &cfg.rotation;
    RawRotationConfig {
        subnet: overrides
            .subnet
            .clone()
            .unwrap_or_else(|| rotation.subnet.clone()),
        low: overrides.low.unwrap_or(rotation.low),
        high: overrides.high.unwrap_or(rotation.high),
        max_attempts: rotation.max_attempts,
        reconnect_delay: rotation.reconnect_delay.clone(),
        notify_to: cfg.notify.to.clone(),
        notify_from: cfg.notify.from.clone(),
        rule_comment: rotation.rule_comment.clone(),
        anchor_comment: rotation.anchor_comment.clone(),
    }
}
