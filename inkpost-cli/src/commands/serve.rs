//! HTTP server command
//!
//! Runs the inkpost HTTP server with all `/api` routes and the static
//! `/content` mount.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use inkpost_core::BlogConfig;
use inkpost_server::config::parse_bind;
use inkpost_server::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to, e.g. `:8080` or `127.0.0.1:3000` (overrides PORT)
    #[arg(long, short = 'b')]
    pub bind: Option<String>,

    /// Content root holding posts/ and images/ (overrides CONTENT_DIR)
    #[arg(long)]
    pub content_dir: Option<PathBuf>,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = ServerConfig::from_env().context("Invalid server configuration")?;
    if let Some(bind) = args.bind.as_deref() {
        config.bind_addr = parse_bind(bind).context("Invalid --bind address")?;
    }

    let mut blog = BlogConfig::from_env();
    if let Some(dir) = args.content_dir {
        blog.content_dir = dir;
    }

    tracing::info!("Starting inkpost server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(config, blog).await.context("Server error")?;

    Ok(())
}
