//! Command handlers and shared client construction.

pub mod cameras;
pub mod config_cmd;
pub mod intercoms;

use std::time::Duration;

use url::Url;

use ufanet_api::{
    Credentials, DEFAULT_BASE_URL, TokenSink, TransportConfig, UfanetClient,
};

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::token_cache::{self, CachedTokens};

/// Build an authenticated client for the active contract, wired to the
/// refresh-token cache through the token sink.
///
/// Returns the contract alongside the client so handlers can attach it
/// to error context.
pub fn build_client(global: &GlobalOpts) -> Result<(UfanetClient, String), CliError> {
    let cfg = config::load_config_or_default();
    let contract = config::resolve_contract(global, &cfg)?;
    let password = config::resolve_password(&contract, &cfg);
    let cached = token_cache::load(&contract);

    let base_url: Url = global
        .base_url
        .as_deref()
        .or(cfg.base_url.as_deref())
        .unwrap_or(DEFAULT_BASE_URL)
        .parse()
        .map_err(|e| CliError::Validation {
            field: "base-url".into(),
            reason: format!("{e}"),
        })?;

    let credentials = Credentials {
        contract: contract.clone(),
        password,
        refresh_token: cached.as_ref().map(|c| c.refresh_token.clone()),
        refresh_expires_at: cached.and_then(|c| c.refresh_expires_at),
    };

    let transport = TransportConfig {
        timeout: Duration::from_secs(global.timeout),
    };

    let sink_contract = contract.clone();
    let sink: TokenSink = Box::new(move |update| {
        token_cache::store(
            &sink_contract,
            &CachedTokens {
                refresh_token: update.refresh_token.clone(),
                refresh_expires_at: update.refresh_expires_at,
            },
        )
        .map_err(Into::into)
    });

    let client = UfanetClient::new(base_url, credentials, &transport)
        .map_err(|e| CliError::from_api(e, &contract))?
        .with_token_sink(sink);

    Ok((client, contract))
}
