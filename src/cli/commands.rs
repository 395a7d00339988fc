//! CLI command implementations

use tracing::info;

use crate::http_server::{AppConfig, HttpServer, ServerConfig};

use super::args::{Cli, Command};
use super::errors::CliResult;

/// Dispatch a parsed command
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Serve { host, port } => serve(host, port),
        Command::Check => check(),
    }
}

/// Start the bridge server, blocking until shutdown.
pub fn serve(host: Option<String>, port: Option<u16>) -> CliResult<()> {
    let app = AppConfig::from_env()?;

    let mut config = ServerConfig::default();
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    info!(mount = %app.mount, addr = %config.socket_addr(), "serving blob store over WebDAV");

    let server = HttpServer::new(config, app);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.start())?;
    Ok(())
}

/// Validate the environment configuration without serving.
pub fn check() -> CliResult<()> {
    let app = AppConfig::from_env()?;
    println!("configuration ok");
    println!("  blob service: {}", app.blob_api_url);
    println!("  mount:        {}", app.mount);
    println!("  dav user:     {}", app.credentials.username);
    Ok(())
}
