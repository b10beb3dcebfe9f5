//! CLI argument parsing and command routing

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Gentle: routes chat messages to the best-suited language model
#[derive(Debug, Parser)]
#[command(name = "gentle")]
#[command(about = "Multi-model chat routing backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a JSON config file
    #[arg(long, global = true, env = "GENTLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show which model a message would be routed to
    Route {
        /// The message to classify
        message: String,

        /// Explicit model preference (reasoning, visual, creative)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Send one message and print the result as JSON
    Ask {
        /// The message to send
        message: String,

        /// Explicit model preference (reasoning, visual, creative)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List the model catalog
    Models,

    /// Show version information
    Version,
}

impl Cli {
    /// Parse CLI arguments from environment
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
