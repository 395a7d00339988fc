//! CLI argument definitions using clap
//!
//! Commands:
//! - blobdav serve [--host <host>] [--port <port>]
//! - blobdav check

use clap::{Parser, Subcommand};

/// blobdav - WebDAV bridge over a remote blob store
#[derive(Parser, Debug)]
#[command(name = "blobdav")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the bridge server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate the environment configuration and exit
    Check,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
