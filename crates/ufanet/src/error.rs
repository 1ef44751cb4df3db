//! CLI error types with miette diagnostics.
//!
//! Maps `ufanet_api::Error` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use ufanet_api::Error as ApiError;

/// Exit codes for scripting.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Ufanet API")]
    #[diagnostic(
        code(ufanet::connection_failed),
        help("Check your network connection and try again.")
    )]
    ConnectionFailed {
        #[source]
        source: ApiError,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(ufanet::timeout),
        help("Increase --timeout or try again later.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for contract '{contract}'")]
    #[diagnostic(
        code(ufanet::auth_failed),
        help(
            "The stored credentials were rejected or have expired.\n\
             Re-enter them with: ufanet config init"
        )
    )]
    AuthFailed { contract: String },

    #[error("No contract number configured")]
    #[diagnostic(
        code(ufanet::no_contract),
        help("Pass --contract, set UFANET_CONTRACT, or run: ufanet config init")
    )]
    NoContract,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource} '{identifier}' not found")]
    #[diagnostic(
        code(ufanet::not_found),
        help("Run: ufanet {list_command} to see what is available")
    )]
    NotFound {
        resource: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(ufanet::api_error))]
    Api { status: u16, message: String },

    #[error("{0}")]
    #[diagnostic(code(ufanet::general))]
    General(String),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(ufanet::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(ufanet::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(ufanet::keyring),
        help("The system keyring is unavailable; set UFANET_PASSWORD instead.")
    )]
    Keyring(#[from] keyring::Error),

    #[error("Could not write configuration: {0}")]
    #[diagnostic(code(ufanet::config_write))]
    TomlSerialize(#[from] toml::ser::Error),

    // ── Interactive ──────────────────────────────────────────────────
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::NoContract | Self::Validation { .. } => exit_code::USAGE,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            _ => exit_code::GENERAL,
        }
    }

    /// Map a core API error into a user-facing CLI error. The contract
    /// gives auth failures their context.
    pub fn from_api(err: ApiError, contract: &str) -> Self {
        match err {
            ApiError::InvalidCredentials { .. }
            | ApiError::RefreshTokenExpired
            | ApiError::TokenRejected => Self::AuthFailed {
                contract: contract.to_owned(),
            },
            ApiError::Transport(ref e) if e.is_timeout() => Self::Timeout,
            ApiError::Transport(_) | ApiError::InvalidUrl(_) => {
                Self::ConnectionFailed { source: err }
            }
            ApiError::Api { status, message } => Self::Api { status, message },
            other => Self::General(other.to_string()),
        }
    }
}
