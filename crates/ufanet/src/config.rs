//! CLI-owned configuration: the TOML file, env overrides, and the
//! password resolution chain (env var -> system keyring -> config file).
//!
//! The password is deliberately never written to the config file by the
//! CLI itself; `ufanet config init` puts it in the keyring. The
//! plaintext field exists only for users who accept the tradeoff and
//! edit the file by hand.

use std::path::PathBuf;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Keyring service name; the account is `{contract}/password`.
pub const KEYRING_SERVICE: &str = "ufanet";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Contract number used when --contract is not given.
    pub contract: Option<String>,

    /// API base URL override.
    pub base_url: Option<String>,

    /// Plaintext password (prefer the keyring; see module docs).
    pub password: Option<String>,
}

// ── Paths ────────────────────────────────────────────────────────────

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("ru", "ufanet", "ufanet")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| home_fallback(".config").join("config.toml"))
}

pub(crate) fn home_fallback(subdir: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(subdir);
    p.push("ufanet");
    p
}

// ── Loading ──────────────────────────────────────────────────────────

/// Load the full config from file + environment.
pub fn load_config() -> Result<Config, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("UFANET_"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Resolution ───────────────────────────────────────────────────────

/// Resolve the active contract: flag/env wins over the config file.
pub fn resolve_contract(global: &GlobalOpts, config: &Config) -> Result<String, CliError> {
    global
        .contract
        .clone()
        .or_else(|| config.contract.clone())
        .ok_or(CliError::NoContract)
}

/// Resolve the password for a contract: env var, then keyring, then
/// plaintext config. `None` means nothing is stored -- the client can
/// still run from a cached refresh token until that expires.
pub fn resolve_password(contract: &str, config: &Config) -> Option<SecretString> {
    if let Ok(pw) = std::env::var("UFANET_PASSWORD") {
        return Some(SecretString::from(pw));
    }

    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{contract}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Some(SecretString::from(pw));
        }
    }

    config.password.clone().map(SecretString::from)
}

/// Delete the stored password for a contract from the keyring. A missing
/// entry is not an error; anything else (locked keyring, platform
/// failure) surfaces to the caller.
pub fn forget_password(contract: &str) -> Result<(), CliError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{contract}/password"))?;
    match entry.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(err) => Err(err.into()),
    }
}
