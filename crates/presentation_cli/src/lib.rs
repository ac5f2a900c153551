//! weather-collector
//!
//! Command-line entry point wiring configuration, logging, storage, the
//! Open-Meteo adapter and the fixed-rate scheduler together.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, log_filter_from_verbosity};
pub use commands::CliError;
