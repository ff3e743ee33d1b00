//! Command-line interface for fliesdemo.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Spider-and-flies game session for a remote presentation service
#[derive(Parser, Debug)]
#[command(name = "fliesdemo")]
#[command(about = "Plays spider-and-flies against a presentation service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file (defaults are used if it does not exist)
    #[arg(short, long, global = true, default_value = "fliesdemo.toml")]
    pub config: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to a running presentation service and play until it hangs up
    Connect {
        /// Host to connect to
        #[arg(long)]
        host: Option<String>,

        /// Port to connect to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Accept presentation service connections, one session at a time
    Listen {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },
}
