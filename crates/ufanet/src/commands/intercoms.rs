//! Intercom command handlers.

use tabled::Tabled;

use ufanet_api::Intercom;

use crate::cli::{GlobalOpts, IntercomsArgs, IntercomsCommand};
use crate::error::CliError;
use crate::output;

use super::build_client;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct IntercomRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
}

impl From<&Intercom> for IntercomRow {
    fn from(i: &Intercom) -> Self {
        Self {
            id: i.id,
            name: i.display_name(),
            address: i.address.clone().unwrap_or_default(),
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(args: IntercomsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (client, contract) = build_client(global)?;

    match args.command {
        IntercomsCommand::List => {
            let intercoms = client
                .list_intercoms()
                .await
                .map_err(|e| CliError::from_api(e, &contract))?;
            println!(
                "{}",
                output::render_list(&global.output, &intercoms, |i| IntercomRow::from(i), |i| i
                    .id
                    .to_string())?
            );
            Ok(())
        }

        IntercomsCommand::Open { id } => {
            let opened = client
                .open_intercom(id)
                .await
                .map_err(|e| CliError::from_api(e, &contract))?;
            if opened {
                println!("Intercom {id} opened");
                Ok(())
            } else {
                Err(CliError::General(format!(
                    "server declined to open intercom {id}"
                )))
            }
        }
    }
}
