//! weather-collector - Periodic current-weather collection into SQLite

#![allow(clippy::print_stdout)]

use anyhow::{Context, Result};
use clap::Parser;
use domain::CityTable;
use infrastructure::{AppConfig, init_telemetry};
use presentation_cli::{Cli, Commands, commands, log_filter_from_verbosity};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config =
        AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    init_telemetry(&config.telemetry, log_filter_from_verbosity(cli.verbose))
        .context("Failed to initialize logging")?;
    config.validate().context("Invalid configuration")?;

    match cli.selected_command() {
        Commands::Run => {
            commands::run_until(&config, shutdown_signal()).await?;
        },
        Commands::Collect => {
            let outcome = commands::run_once(&config).await?;
            print!("{}", commands::render_records(&outcome.stored));
            println!(
                "Collection pass stored {} records; {} in total",
                outcome.stored.len(),
                outcome.total
            );
        },
        Commands::Migrate => {
            commands::run_migrate(&config.database).await?;
            println!("Migrations applied to {}", config.database.url);
        },
        Commands::Cities => {
            print!("{}", commands::render_city_table(&CityTable::default()));
        },
    }

    Ok(())
}

/// Resolve on Ctrl-C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C"),
        () = terminate => info!("Received SIGTERM"),
    }
}
