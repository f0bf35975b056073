//! Offline post maintenance
//!
//! Works directly on the content directory, no server required.
//!
//! ```bash
//! inkpost posts list --trash --json | jq '.[].id'
//! inkpost posts purge 2024-01-01T10-00-Hello
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inkpost_core::{BlogConfig, ListFilter, Post, PostStore};

#[derive(Parser, Debug)]
pub struct PostsArgs {
    /// Content root holding posts/ and images/ (default: CONTENT_DIR)
    #[arg(long, env = "CONTENT_DIR", global = true)]
    pub content_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: PostsCommands,
}

#[derive(Subcommand, Debug)]
pub enum PostsCommands {
    /// List posts, newest first
    List(ListArgs),
    /// Print a single post
    Show(ShowArgs),
    /// Move a post to the trash
    Trash(IdArgs),
    /// Bring a post back from the trash
    Restore(IdArgs),
    /// Delete a post and the images it references
    Purge(IdArgs),
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// List trashed posts instead
    #[arg(long)]
    pub trash: bool,

    /// Only posts in this category
    #[arg(long)]
    pub category: Option<String>,

    /// Only posts carrying this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// JSON output (for piping to jq)
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Post id (file name without .md)
    pub id: String,

    /// JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct IdArgs {
    /// Post id (file name without .md)
    pub id: String,
}

pub async fn run_posts(args: PostsArgs) -> Result<()> {
    let mut config = BlogConfig::from_env();
    if let Some(dir) = args.content_dir {
        config.content_dir = dir;
    }

    let store = PostStore::open(config.clone())
        .await
        .with_context(|| format!("Failed to open {}", config.content_dir.display()))?;

    match args.command {
        PostsCommands::List(list) => run_list(&store, list).await,
        PostsCommands::Show(show) => run_show(&store, show).await,
        PostsCommands::Trash(IdArgs { id }) => {
            store
                .soft_delete(&id)
                .await
                .with_context(|| format!("Failed to trash '{}'", id))?;
            println!("Moved {} to trash", id);
            Ok(())
        }
        PostsCommands::Restore(IdArgs { id }) => {
            store
                .restore(&id)
                .await
                .with_context(|| format!("Failed to restore '{}'", id))?;
            println!("Restored {}", id);
            Ok(())
        }
        PostsCommands::Purge(IdArgs { id }) => {
            store
                .permanent_delete(&id)
                .await
                .with_context(|| format!("Failed to purge '{}'", id))?;
            println!("Permanently deleted {}", id);
            Ok(())
        }
    }
}

async fn run_list(store: &PostStore, args: ListArgs) -> Result<()> {
    let filter = ListFilter {
        category: args.category,
        tag: args.tag,
    };
    let posts = store
        .list_filtered(args.trash, &filter)
        .await
        .context("Failed to list posts")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    if posts.is_empty() {
        println!("No posts");
        return Ok(());
    }
    for post in &posts {
        println!("{}", summary_line(post));
    }
    Ok(())
}

async fn run_show(store: &PostStore, args: ShowArgs) -> Result<()> {
    let post = store
        .read(&args.id)
        .await
        .with_context(|| format!("Failed to read '{}'", args.id))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&post)?);
        return Ok(());
    }

    println!("┌─ {}", post.title);
    println!("│ id:       {}", post.id);
    println!("│ created:  {}", post.created);
    println!("│ updated:  {}", post.updated);
    if !post.category.is_empty() {
        println!("│ category: {}", post.category);
    }
    if !post.tags.is_empty() {
        println!("│ tags:     {}", post.tags.join(", "));
    }
    if post.deleted {
        println!("│ (in trash)");
    }
    println!("└─");
    println!();
    println!("{}", post.content);
    Ok(())
}

fn summary_line(post: &Post) -> String {
    let mut line = format!("{}  {}  {}", post.created, post.id, post.title);
    if !post.category.is_empty() {
        line.push_str(&format!(" [{}]", post.category));
    }
    line
}
