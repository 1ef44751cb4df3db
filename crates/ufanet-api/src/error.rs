use thiserror::Error;

/// Top-level error type for the `ufanet-api` crate.
///
/// Auth failures are split into distinct variants so callers can tell
/// recoverable conditions (refresh, relogin) from ones that need user
/// involvement (new credentials).
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Password login rejected by the server. Unrecoverable without new
    /// credentials; the host should run its reauth flow.
    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },

    /// An authenticated call came back 401/403 even after the one-shot
    /// refresh-or-relogin recovery.
    #[error("Access token rejected by the server")]
    TokenRejected,

    /// The refresh token was rejected or has expired, and no password is
    /// available to fall back on.
    #[error("Refresh token expired -- re-authentication required")]
    RefreshTokenExpired,

    /// The host's token persistence callback failed.
    #[error("Token update callback failed: {0}")]
    TokenSink(#[source] Box<dyn std::error::Error + Send + Sync>),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    /// Never retried by this client; surfaced immediately.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── API ─────────────────────────────────────────────────────────
    /// Non-auth HTTP failure from the vendor API.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The camera record has no screenshot serving domain.
    #[error("Camera {number} does not expose snapshots")]
    SnapshotUnavailable { number: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error means the current token material is
    /// no longer accepted and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. } | Self::RefreshTokenExpired | Self::TokenRejected
        )
    }

    /// Returns `true` if this is a transient transport error the caller
    /// may reasonably retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
