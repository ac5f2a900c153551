//! Command-line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Periodic current-weather collector
#[derive(Debug, Parser)]
#[command(name = "weather-collector")]
#[command(author, version, about = "Poll Open-Meteo for a fixed set of cities and store the readings", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML); defaults to ./config.toml when present
    #[arg(short, long, global = true, env = "WEATHER_COLLECTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Run the collector on its fixed interval until Ctrl-C (default)
    Run,

    /// Run a single collection pass and exit
    Collect,

    /// Apply database migrations and exit
    Migrate,

    /// Print the compiled-in city table
    Cities,
}

impl Cli {
    /// Subcommand to execute, `run` when none was given
    #[must_use]
    pub fn selected_command(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }
}

/// Log filter override for a `-v` count; `None` keeps the configured filter
#[must_use]
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some(
            "weather_collector=debug,presentation_cli=debug,application=debug,\
             infrastructure=debug,integration_weather=debug",
        ),
        2 => Some(
            "weather_collector=trace,presentation_cli=trace,application=trace,\
             infrastructure=trace,integration_weather=trace",
        ),
        _ => Some("trace"),
    }
}
