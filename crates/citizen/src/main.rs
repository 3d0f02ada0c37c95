mod cli;
mod commands;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use fixmyroad_pipeline::{ClientConfig, ReportForm};
use fixmyroad_store::{FileBackend, ReportStore};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "fixmyroad=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if cli.live {
        config.demo_mode = false;
    } else if cli.demo {
        config.demo_mode = true;
    }
    tracing::debug!(?config, "Loaded client configuration");

    let store = Arc::new(ReportStore::new(Arc::new(FileBackend::new(
        config.data_dir.clone(),
    ))));

    match cli.cmd {
        Command::Submit {
            location,
            description,
            category,
            photo,
        } => {
            let form = ReportForm {
                category,
                location,
                description,
                photo,
            };
            commands::submit(&config, store, form, cli.json).await
        }
        Command::Reports { id } => commands::reports(&store, id, cli.json),
        Command::Stats { refresh } => commands::stats(&store, refresh, cli.json),
        Command::Dashboard { watch } => commands::dashboard(&config, store, watch, cli.json).await,
        Command::UpdateStatus { id, status, stages } => {
            commands::update_status(&store, &id, status, stages)
        }
    }
}
