//! Bloodlink CLI
//!
//! Drives the blood request workflow from a terminal: submit a request, list
//! matching donors, and notify them. Each subcommand plays the part of one
//! page; the session store carries the request between invocations.

mod commands;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use bloodlink_workflow::WorkflowController;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::BloodlinkConfig;

/// Bloodlink CLI: request blood, find donors, notify them.
#[derive(Parser, Debug)]
#[command(name = "bloodlink", version, about)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "bloodlink.toml", global = true)]
    config: PathBuf,

    /// Collaborator endpoint URL (overrides the config file).
    #[arg(long, env = "BLOODLINK_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// Session name (overrides the config file).
    #[arg(long, env = "BLOODLINK_SESSION", global = true)]
    session: Option<String>,

    /// Directory for session files (overrides the config file).
    #[arg(long, env = "BLOODLINK_SESSION_DIR", global = true)]
    session_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a blood request, then list matching donors.
    Request(commands::request::RequestArgs),
    /// List donors for the stored request or a manual search.
    Donors(commands::donors::SearchArgs),
    /// Notify every matching donor about the stored request.
    Notify(commands::donors::SearchArgs),
    /// Print the stored request.
    Show,
    /// Drop the stored request.
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = BloodlinkConfig::load(&cli.config)?;
    if let Some(endpoint) = cli.endpoint {
        config.collaborator.endpoint = endpoint;
    }
    if let Some(session) = cli.session {
        config.session.name = session;
    }
    if let Some(dir) = cli.session_dir {
        config.session.dir = dir;
    }

    tracing::debug!(
        endpoint = %config.collaborator.endpoint,
        session = %config.session.name,
        "configuration loaded"
    );

    let store = config.store()?;
    let api = Arc::new(config.client()?);
    let workflow = WorkflowController::new(api, store.clone(), config.workflow());

    match cli.command {
        Command::Request(args) => commands::request::run(workflow, &args, &cli.format).await,
        Command::Donors(args) => commands::donors::run(workflow, &args, &cli.format).await,
        Command::Notify(args) => commands::notify::run(workflow, &args, &cli.format).await,
        Command::Show => commands::show::run(&store, &cli.format).await,
        Command::Clear => commands::clear::run(&store).await,
    }
}
