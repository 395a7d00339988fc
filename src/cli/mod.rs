//! CLI module for blobdav
//!
//! Provides the command-line interface:
//! - serve: start the bridge server
//! - check: validate environment configuration

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check, run_command, serve};
pub use errors::{CliError, CliResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parse arguments, initialize logging, and run the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(&cli.log_level);
    run_command(cli)
}

/// Initialize logging
fn init_logging(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| level.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
