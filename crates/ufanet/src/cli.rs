//! Clap derive structures for the `ufanet` CLI.
//!
//! Defines the command tree, global flags, and shared enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ufanet -- command-line client for Ufanet intercoms and cameras
#[derive(Debug, Parser)]
#[command(
    name = "ufanet",
    version,
    about = "Open Ufanet intercoms and inspect camera streams from the command line",
    long_about = "Command-line client for the Ufanet intercom/CCTV service (dom.ufanet.ru).\n\n\
        Authenticates by contract number, keeps the refresh token cached between\n\
        invocations, and stores the password in the system keyring.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Contract number (account identifier)
    #[arg(long, short = 'c', env = "UFANET_CONTRACT", global = true)]
    pub contract: Option<String>,

    /// API base URL override (testing against a local mock)
    #[arg(long, env = "UFANET_BASE_URL", global = true, hide = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "UFANET_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Request timeout in seconds
    #[arg(long, env = "UFANET_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List and open intercoms
    #[command(alias = "ic")]
    Intercoms(IntercomsArgs),

    /// Inspect cameras and their stream URLs
    #[command(alias = "cam")]
    Cameras(CamerasArgs),

    /// Manage credentials and configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Intercoms ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct IntercomsArgs {
    #[command(subcommand)]
    pub command: IntercomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum IntercomsCommand {
    /// List intercoms shared with the contract
    #[command(alias = "ls")]
    List,

    /// Open an intercom door
    Open {
        /// Intercom identifier (see `ufanet intercoms list`)
        id: u64,
    },
}

// ── Cameras ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CamerasArgs {
    #[command(subcommand)]
    pub command: CamerasCommand,
}

#[derive(Debug, Subcommand)]
pub enum CamerasCommand {
    /// List cameras with stream info
    #[command(alias = "ls")]
    List,

    /// Print the RTSP stream URL for a camera
    StreamUrl {
        /// Camera number (see `ufanet cameras list`)
        number: String,
    },

    /// Download a still image from a camera
    Snapshot {
        /// Camera number (see `ufanet cameras list`)
        number: String,

        /// Write the image here instead of `<number>.jpg`
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactively set up the contract number and password
    Init,

    /// Show the active configuration (secrets redacted)
    Show,

    /// Remove the stored password and cached tokens for the contract
    Forget,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
