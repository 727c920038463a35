//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use gwrotate_config::ConfigError;
use gwrotate_core::{CoreError, TopologyStep, ValidationErrors};

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const TOPOLOGY: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const LOCKED: i32 = 9;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to router at {url}")]
    #[diagnostic(
        code(gwrotate::connection_failed),
        help(
            "{reason}\n\
             Check that the REST API (www-ssl service) is enabled and reachable."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Router request timed out")]
    #[diagnostic(
        code(gwrotate::timeout),
        help("Increase router.timeout or check router responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(gwrotate::auth_failed),
        help("Check router.username and the password in GWROTATE_PASSWORD, the keyring or the config file.")
    )]
    AuthFailed { message: String },

    #[error("No password configured for {account}")]
    #[diagnostic(
        code(gwrotate::no_credentials),
        help("Set GWROTATE_PASSWORD, store it in the keyring under service 'gwrotate', or set router.password.")
    )]
    NoCredentials { account: String },

    // ── Pre-flight ───────────────────────────────────────────────────
    #[error("Configuration invalid: {count} error(s)\n{listing}")]
    #[diagnostic(code(gwrotate::invalid_config))]
    InvalidConfig { count: usize, listing: String },

    #[error("Topology resolution failed at {step}: {message}")]
    #[diagnostic(code(gwrotate::topology))]
    Topology { step: TopologyStep, message: String },

    #[error("No usable gateway after {attempts} collisions with {current}")]
    #[diagnostic(
        code(gwrotate::gateway_exhausted),
        help("Widen the low/high range or raise rotation.max_attempts.")
    )]
    GatewayExhausted { attempts: u32, current: String },

    #[error("Another rotation is running: {holder}")]
    #[diagnostic(
        code(gwrotate::locked),
        help("If no rotation is active, remove the stale lock file: {path}")
    )]
    Locked { path: String, holder: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("{entity} not found: {identifier}")]
    #[diagnostic(code(gwrotate::not_found))]
    NotFound { entity: String, identifier: String },

    #[error("Router error: {message}")]
    #[diagnostic(code(gwrotate::device))]
    Device { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gwrotate::validation))]
    Validation { field: String, reason: String },

    #[error("Failed to load configuration: {message}")]
    #[diagnostic(code(gwrotate::config), help("Expected at: {path}"))]
    Config { message: String, path: String },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(gwrotate::json))]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(gwrotate::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::InvalidConfig { .. } | Self::Validation { .. } | Self::Config { .. } => {
                exit_code::USAGE
            }
            Self::Topology { .. } | Self::NotFound { .. } => exit_code::TOPOLOGY,
            Self::Locked { .. } => exit_code::LOCKED,
            _ => exit_code::GENERAL,
        }
    }

    pub fn invalid_config(errors: &ValidationErrors) -> Self {
        Self::InvalidConfig {
            count: errors.len(),
            listing: errors.to_string(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { errors } => CliError::invalid_config(&errors),
            CoreError::Topology { step, message } => CliError::Topology { step, message },
            CoreError::GatewayExhausted { attempts, current } => {
                CliError::GatewayExhausted { attempts, current }
            }
            CoreError::Locked { path, holder } => CliError::Locked {
                path: path.display().to_string(),
                holder,
            },
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout => CliError::Timeout,
            CoreError::NotFound { entity, identifier } => CliError::NotFound { entity, identifier },
            CoreError::Device { message, status } => CliError::Device {
                message: match status {
                    Some(status) => format!("{message} (HTTP {status})"),
                    None => message,
                },
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { username, host } => CliError::NoCredentials {
                account: format!("{username}@{host}"),
            },
            ConfigError::Serialization(e) => CliError::Internal(e.to_string()),
            ConfigError::Figment(e) => CliError::Config {
                message: e.to_string(),
                path: gwrotate_config::config_path().display().to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
