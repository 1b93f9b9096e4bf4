use anyhow::Result;
use clap::Parser;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

use todo::{build_app, db::run_migrations};

#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Todo list web application", long_about = None)]
struct Args {
    /// SQLite database path
    #[arg(long, default_value = "todos.db")]
    db: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", args.db))?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    run_migrations(&pool).await?;

    let app = build_app(pool);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "todo app listening");
    axum::serve(listener, app).await?;
    Ok(())
}
