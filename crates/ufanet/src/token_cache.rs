//! File-backed refresh-token cache, keyed by contract.
//!
//! The host half of the token lifecycle: the API client reports every
//! token change through its sink, and this cache persists the refresh
//! token and its expiry so later invocations can skip the password
//! login. The password itself is never written here.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{home_fallback, project_dirs};
use crate::error::CliError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedTokens {
    pub refresh_token: String,
    pub refresh_expires_at: Option<DateTime<Utc>>,
}

/// Resolve the cache file path in the platform data dir.
pub fn cache_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("tokens.json"))
        .unwrap_or_else(|| home_fallback(".local/share").join("tokens.json"))
}

/// Load the cached tokens for one contract, if any.
pub fn load(contract: &str) -> Option<CachedTokens> {
    load_at(&cache_path(), contract)
}

/// Persist tokens for one contract, preserving other contracts' entries.
pub fn store(contract: &str, tokens: &CachedTokens) -> Result<(), CliError> {
    store_at(&cache_path(), contract, tokens)
}

/// Drop the cached tokens for one contract.
pub fn clear(contract: &str) -> Result<(), CliError> {
    clear_at(&cache_path(), contract)
}

fn read_map(path: &Path) -> HashMap<String, CachedTokens> {
    fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

fn load_at(path: &Path, contract: &str) -> Option<CachedTokens> {
    read_map(path).remove(contract)
}

fn store_at(path: &Path, contract: &str, tokens: &CachedTokens) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut map = read_map(path);
    map.insert(contract.to_owned(), tokens.clone());
    fs::write(path, serde_json::to_vec_pretty(&map)?)?;
    debug!("persisted refresh token for contract {contract}");
    Ok(())
}

fn clear_at(path: &Path, contract: &str) -> Result<(), CliError> {
    let mut map = read_map(path);
    if map.remove(contract).is_some() {
        fs::write(path, serde_json::to_vec_pretty(&map)?)?;
    }
    Ok(())
}
