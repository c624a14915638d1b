//! verdia-api - Product scanning and ingredient research backend
//!
//! Flags watchlisted ingredients in scanned products and generates
//! cached research briefs for flagged ingredients from published
//! abstracts.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use verdia_api::research::ResearchClient;
use verdia_api::AppState;
use verdia_common::config;

#[derive(Parser, Debug)]
#[command(name = "verdia-api", about = "Verdia ingredient research backend")]
struct Args {
    /// Path to the TOML config file (default: platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP listen port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Path to the SQLite database (overrides config and env)
    #[arg(long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting verdia-api");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let toml_config = config::load_toml_config(args.config.as_deref())?;
    let port = config::resolve_port(args.port, &toml_config);
    let db_path = config::resolve_database_path(args.database.as_deref(), &toml_config);
    info!("Database: {}", db_path.display());

    let db_pool = verdia_common::db::init_database(&db_path).await?;
    info!("Database connection established");

    let settings = verdia_api::config::research_client_settings(&toml_config)?;
    let provider_timeout = settings.timeout;
    let research_client = Arc::new(ResearchClient::new(settings));

    let state = AppState::new(db_pool, research_client, provider_timeout);
    let app = verdia_api::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
