use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use museum_api::app::{app, AppState};
use museum_api::auth::TokenIssuer;
use museum_api::config::{self, AppConfig};
use museum_api::database::{models, DatabaseManager, DocumentStore, InMemoryStore, PgDocumentStore};
use museum_api::is_production;

#[derive(Parser)]
#[command(name = "museum-api")]
#[command(about = "Content API for education areas, recommendations and exhibition rooms")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start the HTTP server (default)")]
    Serve,

    #[command(about = "Issue an identity token for a subject id")]
    Token {
        #[arg(help = "Subject identifier to bind into the token")]
        subject: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::config();

    if config.security.uses_fallback_secret() {
        if is_production!() {
            tracing::error!("JWT_SECRET is not set; tokens are signed with the built-in fallback secret");
        } else {
            tracing::warn!("JWT_SECRET is not set; using the built-in fallback secret");
        }
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Token { subject } => {
            let token = TokenIssuer::from_config()
                .create_token(&subject)
                .context("failed to issue token")?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Museum API in {:?} mode", config.environment);

    let store = open_store(config).await?;
    let state = AppState::new(store, TokenIssuer::from_config());
    let app = app(state, config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Museum API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    if config.database.url.is_none() {
        tracing::warn!("DATABASE_URL is not set; using the in-memory store (data is lost on exit)");
        return Ok(Arc::new(InMemoryStore::new()));
    }

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    DatabaseManager::ensure_schema(&pool, &models::collections())
        .await
        .context("failed to prepare database schema")?;

    Ok(Arc::new(PgDocumentStore::new(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
