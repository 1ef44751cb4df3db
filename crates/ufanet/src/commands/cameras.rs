//! Camera command handlers.

use std::path::PathBuf;

use tabled::Tabled;

use ufanet_api::{Camera, UfanetClient};

use crate::cli::{CamerasArgs, CamerasCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::build_client;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct CameraRow {
    #[tabled(rename = "Number")]
    number: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Snapshots")]
    snapshots: &'static str,
}

impl From<&Camera> for CameraRow {
    fn from(c: &Camera) -> Self {
        Self {
            number: c.number.clone(),
            name: c.display_name().to_owned(),
            address: c.address.clone().unwrap_or_default(),
            snapshots: if c.screenshot_domain.is_some() {
                "yes"
            } else {
                "no"
            },
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn handle(args: CamerasArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (client, contract) = build_client(global)?;

    match args.command {
        CamerasCommand::List => {
            let cameras = client
                .list_cameras()
                .await
                .map_err(|e| CliError::from_api(e, &contract))?;
            println!(
                "{}",
                output::render_list(&global.output, &cameras, |c| CameraRow::from(c), |c| c
                    .number
                    .clone())?
            );
            Ok(())
        }

        CamerasCommand::StreamUrl { number } => {
            let camera = find_camera(&client, &contract, &number).await?;
            println!("{}", camera.stream_url());
            Ok(())
        }

        CamerasCommand::Snapshot { number, path } => {
            let camera = find_camera(&client, &contract, &number).await?;
            let image = client
                .fetch_snapshot(&camera)
                .await
                .map_err(|e| CliError::from_api(e, &contract))?;

            let path = path.unwrap_or_else(|| PathBuf::from(format!("{number}.jpg")));
            std::fs::write(&path, &image)?;
            println!("Wrote {} bytes to {}", image.len(), path.display());
            Ok(())
        }
    }
}

async fn find_camera(
    client: &UfanetClient,
    contract: &str,
    number: &str,
) -> Result<Camera, CliError> {
    let cameras = client
        .list_cameras()
        .await
        .map_err(|e| CliError::from_api(e, contract))?;

    cameras
        .into_iter()
        .find(|c| c.number == number)
        .ok_or_else(|| CliError::NotFound {
            resource: "camera".into(),
            identifier: number.to_owned(),
            list_command: "cameras list".into(),
        })
}
