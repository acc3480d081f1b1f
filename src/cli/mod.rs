//! CLI module for the categorization service

pub mod serve;

use clap::{Parser, Subcommand};

/// PeerNest Categorization Service - LLM-backed struggle categorization
#[derive(Parser)]
#[command(name = "peernest-categorization")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the categorization API server
    Serve,
}
