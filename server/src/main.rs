use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{fmt, EnvFilter};

use server::docs::{DocsSearch, DEFAULT_ARCHIVE_PATH, DEFAULT_ARCHIVE_URL};
use server::tools::DocsService;

#[derive(Parser)]
#[command(name = "server")]
#[command(about = "MCP server exposing documentation search tools over stdio", long_about = None)]
struct Args {
    /// Documentation archive URL
    #[arg(long, default_value = DEFAULT_ARCHIVE_URL)]
    archive_url: String,
    /// Local path for the cached archive
    #[arg(long, default_value = DEFAULT_ARCHIVE_PATH)]
    archive_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Stdout carries the MCP protocol; logs must go to stderr.
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let docs = Arc::new(DocsSearch::new(args.archive_url, args.archive_path));
    let service = DocsService::new(docs).serve(stdio()).await?;
    tracing::info!("mcp server ready on stdio");
    service.waiting().await?;
    Ok(())
}
