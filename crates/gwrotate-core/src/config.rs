// ── Runtime configuration ──
//
// `RouterConfig` describes *how* to reach the router; `RawRotationConfig`
// carries the rotation tunables as loaded (layered defaults, file, env and
// scheduler overrides). The only way to a `RotationConfig` is through
// `RawRotationConfig::validate`, after which it is never mutated.

use std::fmt;
use std::time::Duration;

use secrecy::SecretString;
use serde::Serialize;
use url::Url;

use crate::validate::{self, ValidationErrors};

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed `www-ssl` certificate). Default for routers.
    #[default]
    DangerAcceptInvalid,
}

/// Which wireless package the router runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WirelessPackage {
    #[default]
    Wifi,
    Wifiwave2,
}

/// Configuration for connecting to a single router.
///
/// Built by the CLI, passed to [`crate::routeros::connect`] -- core never
/// reads config files.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Router URL (e.g., `https://192.168.88.1`).
    pub url: Url,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    pub timeout: Duration,
    pub wireless: WirelessPackage,
}

// ── Rotation tunables ───────────────────────────────────────────────

/// Rotation settings as loaded, before validation.
///
/// Numeric fields are wide signed integers so that out-of-range input is
/// reported by the validator instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRotationConfig {
    pub subnet: String,
    pub low: i64,
    pub high: i64,
    pub max_attempts: i64,
    pub reconnect_delay: String,
    pub notify_to: Option<String>,
    pub notify_from: Option<String>,
    pub rule_comment: String,
    pub anchor_comment: String,
}

impl RawRotationConfig {
    /// Check every field, collecting all defects.
    pub fn validate(&self) -> Result<RotationConfig, ValidationErrors> {
        validate::validate(self)
    }

    /// Notification targets, if both addresses are configured and well formed.
    ///
    /// Used to report validation failures, when no `RotationConfig` exists.
    pub fn notify_targets(&self) -> Option<NotifyTargets> {
        let to = self.notify_to.as_deref().filter(|s| !s.is_empty())?;
        let from = self.notify_from.as_deref().filter(|s| !s.is_empty())?;
        if validate::is_email_shaped(to) && validate::is_email_shaped(from) {
            Some(NotifyTargets {
                to: to.to_owned(),
                from: from.to_owned(),
            })
        } else {
            None
        }
    }
}

/// The three leading octets of the rotated /24 segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subnet([u8; 3]);

impl Subnet {
    pub(crate) fn new(octets: [u8; 3]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 3] {
        self.0
    }

    /// Network address, e.g. `10.0.5.0`.
    pub fn network(&self) -> String {
        self.host(0)
    }

    /// Network in CIDR form, e.g. `10.0.5.0/24`.
    pub fn cidr(&self) -> String {
        format!("{}/24", self.network())
    }

    /// Host address `<subnet>.<last>`.
    pub fn host(&self, last: u8) -> String {
        format!("{self}.{last}")
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{a}.{b}.{c}")
    }
}

/// Where failure reports go. Present only when both ends are configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotifyTargets {
    pub to: String,
    pub from: String,
}

/// Validated, frozen rotation settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationConfig {
    pub(crate) subnet: Subnet,
    pub(crate) low: u8,
    pub(crate) high: u8,
    pub(crate) max_attempts: u32,
    pub(crate) reconnect_delay: Duration,
    pub(crate) notify: Option<NotifyTargets>,
    pub(crate) rule_comment: String,
    pub(crate) anchor_comment: String,
}

impl RotationConfig {
    pub fn subnet(&self) -> Subnet {
        self.subnet
    }

    /// Inclusive bounds of the gateway's last octet.
    pub fn bounds(&self) -> (u8, u8) {
        (self.low, self.high)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Wait between re-enabling radios and restoring client permissions.
    pub fn reconnect_delay(&self) -> Duration {
        self.reconnect_delay
    }

    pub fn notify(&self) -> Option<&NotifyTargets> {
        self.notify.as_ref()
    }

    /// Comment tag shared by the managed TCP/UDP block rules.
    pub fn rule_comment(&self) -> &str {
        &self.rule_comment
    }

    /// Comment tag of the placeholder rule the block rules are placed before.
    pub fn anchor_comment(&self) -> &str {
        &self.anchor_comment
    }
}
