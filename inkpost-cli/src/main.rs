//! inkpost CLI - personal publishing backend
//!
//! This is the main entry point for the inkpost command-line tool, which provides:
//! - The HTTP server for posts, trash, photos and uploads (`serve`)
//! - Offline post maintenance against the content directory (`posts`)

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "inkpost",
    author,
    version,
    about = "Markdown-file blog backend with a trash lifecycle and a photo list",
    long_about = "Serve posts stored as markdown files with frontmatter, plus a JSON photo \
                  list and image uploads. The posts directory is the database."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Inspect and maintain posts without the server
    Posts(commands::posts::PostsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the environment may already be set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Posts(args) => commands::run_posts(args).await?,
    }
    Ok(())
}
