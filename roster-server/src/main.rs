//! rosterd - HTTP server for the reviewer roster service
//!
//! Thin transport layer: routing, request/response shaping, and error
//! envelopes. All assignment logic lives in roster-db.

mod api;
mod error;
mod routes;

use std::path::PathBuf;

use actix_web::{web, App, HttpServer};
use clap::Parser;
use roster_core::Config;
use roster_db::{Database, DatabaseConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Reviewer roster: assigns and reassigns pull request reviewers within a team
#[derive(Parser, Debug)]
#[command(name = "rosterd")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to bind (overrides config and env)
    #[arg(long, env = "ROSTER_HOST")]
    host: Option<String>,

    /// Port to listen on (overrides config and env)
    #[arg(long, env = "ROSTER_PORT")]
    port: Option<u16>,

    /// Path to the SQLite database file (overrides config and env)
    #[arg(long, env = "ROSTER_DB_PATH")]
    db_path: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load_with_overrides(cli.host, cli.port, cli.db_path)?;

    let db_config = DatabaseConfig::new(config.database.path.clone())
        .with_max_connections(config.database.max_connections);
    let db = Database::connect(db_config).await?;
    let data = web::Data::new(db);

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        db = %config.database.path.display(),
        "starting roster server"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
