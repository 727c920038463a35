// ── Core error types ──
//
// Run-level errors from gwrotate-core. Consumers never see HTTP status
// codes or JSON parse failures directly; `From<gwrotate_api::Error>`
// translates transport-layer errors into these variants.

use std::path::PathBuf;

use serde::Serialize;
use strum::Display;
use thiserror::Error;

use crate::validate::ValidationErrors;

/// The topology step that failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TopologyStep {
    Interface,
    Bridge,
    Radios,
    DhcpNetwork,
    FirewallAnchor,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Pre-flight errors (no device state touched) ─────────────────
    #[error("Configuration invalid: {count} error(s)", count = .errors.len())]
    Validation { errors: ValidationErrors },

    #[error("Topology resolution failed ({step}): {message}")]
    Topology { step: TopologyStep, message: String },

    #[error("No usable gateway after {attempts} collisions with {current}")]
    GatewayExhausted { attempts: u32, current: String },

    #[error("Another rotation holds the run lock at {}: {holder}", .path.display())]
    Locked { path: PathBuf, holder: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to router at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Router request timed out")]
    Timeout,

    // ── Device errors ────────────────────────────────────────────────
    #[error("{entity} not found: {identifier}")]
    NotFound { entity: String, identifier: String },

    #[error("Device error: {message}")]
    Device {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if the addressed device item does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the error happened before any device mutation
    /// could have been attempted.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::Topology { .. }
                | Self::GatewayExhausted { .. }
                | Self::Locked { .. }
                | Self::Config { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<gwrotate_api::Error> for CoreError {
    fn from(err: gwrotate_api::Error) -> Self {
        match err {
            gwrotate_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            gwrotate_api::Error::PermissionDenied { message } => CoreError::AuthenticationFailed {
                message: format!("permission denied: {message}"),
            },
            gwrotate_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Device {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            gwrotate_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            gwrotate_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            gwrotate_api::Error::RouterOs {
                status: 404,
                message,
                detail,
            } => CoreError::NotFound {
                entity: "item".into(),
                identifier: detail.unwrap_or(message),
            },
            gwrotate_api::Error::RouterOs {
                status,
                message,
                detail,
            } => CoreError::Device {
                message: match detail {
                    Some(detail) => format!("{message}: {detail}"),
                    None => message,
                },
                status: Some(status),
            },
            gwrotate_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
