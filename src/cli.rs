//! Command-line interface definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Conversational natal chart assistant
#[derive(Debug, Parser)]
#[command(name = "astrobot", version, about)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive conversation in the terminal (default)
    Repl,

    /// Compute one chart directly and print it
    Chart {
        /// Birth date as DD.MM.YYYY
        #[arg(long)]
        date: String,

        /// Birth time as HH:MM
        #[arg(long)]
        time: String,

        /// Birth place (city name)
        #[arg(long)]
        place: String,
    },

    /// Import description texts from a YAML file into the store
    Seed {
        /// YAML file with a list of {point, sign, text} entries
        #[arg(long)]
        file: PathBuf,
    },
}

/// Path of the log file written by the binary
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("astrobot")
        .join("logs")
        .join("astrobot.log")
}
