//! Configuration command handlers: init, show, forget.

use dialoguer::Input;

use ufanet_api::DEFAULT_BASE_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, KEYRING_SERVICE};
use crate::error::CliError;
use crate::token_cache;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::Forget => forget(global),
    }
}

/// Prompt for contract + password, store the password in the keyring,
/// and write the contract to the config file. The password never touches
/// the filesystem.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();

    let mut prompt = Input::<String>::new().with_prompt("Contract number");
    if let Some(current) = global.contract.clone().or_else(|| cfg.contract.clone()) {
        prompt = prompt.default(current);
    }
    let contract = prompt.interact_text()?;

    let password = rpassword::prompt_password("Password: ")?;
    keyring::Entry::new(KEYRING_SERVICE, &format!("{contract}/password"))?
        .set_password(&password)?;

    let path = config::config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let new_cfg = Config {
        contract: Some(contract.clone()),
        base_url: cfg.base_url,
        password: None,
    };
    std::fs::write(&path, toml::to_string_pretty(&new_cfg)?)?;

    println!("Saved configuration to {}", path.display());
    println!("Password for contract {contract} stored in the system keyring");
    Ok(())
}

/// Print the active configuration with secrets redacted.
fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let contract = global.contract.clone().or_else(|| cfg.contract.clone());

    println!("Config file:   {}", config::config_path().display());
    println!("Token cache:   {}", token_cache::cache_path().display());
    println!(
        "Contract:      {}",
        contract.as_deref().unwrap_or("(not set)")
    );
    println!(
        "Base URL:      {}",
        cfg.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    );

    if let Some(contract) = &contract {
        let password = if config::resolve_password(contract, &cfg).is_some() {
            "stored"
        } else {
            "not stored"
        };
        println!("Password:      {password}");

        match token_cache::load(contract) {
            Some(tokens) => match tokens.refresh_expires_at {
                Some(exp) => println!("Refresh token: cached (expires {exp})"),
                None => println!("Refresh token: cached"),
            },
            None => println!("Refresh token: none"),
        }
    }
    Ok(())
}

/// Remove the stored password and cached tokens for the contract.
fn forget(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let contract = config::resolve_contract(global, &cfg)?;

    config::forget_password(&contract)?;
    token_cache::clear(&contract)?;

    println!("Removed stored credentials for contract {contract}");
    Ok(())
}
