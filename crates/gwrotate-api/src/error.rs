use thiserror::Error;

/// Top-level error type for the `gwrotate-api` crate.
///
/// Covers every failure mode of the RouterOS REST surface: authentication,
/// transport, structured device errors, and payload decoding.
/// `gwrotate-core` maps these into run-level diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Router rejected the basic-auth credentials (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Credentials are valid but the user group lacks the `rest-api` /
    /// `write` policy (HTTP 403).
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── RouterOS ────────────────────────────────────────────────────
    /// Structured error from the REST API
    /// (`{"error": 400, "message": "Bad Request", "detail": "..."}`).
    #[error("RouterOS error (HTTP {status}): {message}")]
    RouterOs {
        status: u16,
        message: String,
        detail: Option<String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates rejected credentials.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::PermissionDenied { .. })
    }

    /// Returns `true` if the router reported the addressed item as absent.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::RouterOs { status: 404, .. } => true,
            _ => false,
        }
    }

    /// The `detail` field of a structured RouterOS error, if present.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::RouterOs { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}
