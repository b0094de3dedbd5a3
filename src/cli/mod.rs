//! CLI module for the paper trading API

pub mod serve;

use clap::{Parser, Subcommand};

/// Paper trading API - account provisioning and authentication
#[derive(Parser)]
#[command(name = "papertrade-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
