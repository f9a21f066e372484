//! Binary entry point: wires storage, modules, router, and transport, then
//! serves the webhook and admin routes.

mod app;
mod config;

use anyhow::Result;
use app::{build_app, AppState};
use business_modules::standard_registry;
use chrono::Duration;
use clap::{Parser, Subcommand};
use command_router::{CommandRouter, FallbackMatcher};
use config::ServerConfig;
use kasibot_core::init_tracing;
use kasibot_whatsapp::{WhatsappConfig, WhatsappSender};
use session_store::SessionStore;
use std::path::Path;
use std::sync::Arc;
use storage::Database;
use tracing::info;

#[derive(Parser)]
#[command(name = "kasibot", about = "Conversational commerce dispatcher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the webhook server.
    Run,
}

const EVICTION_SWEEP_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run => run().await,
    }
}

async fn run() -> Result<()> {
    let config = ServerConfig::from_env()?;
    if let Some(parent) = Path::new(&config.log_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    init_tracing(&config.log_file)?;
    info!("step: config loaded, bind_addr={}", config.bind_addr);

    let whatsapp = WhatsappConfig::from_env()?;
    let db = Database::connect(&config.database_url).await?;
    info!("step: database ready at {}", config.database_url);

    let catalog = Arc::new(db.catalog());
    let bookings = Arc::new(db.bookings());
    let orders = Arc::new(db.orders());
    let registry = Arc::new(standard_registry(catalog, bookings, orders));

    let sessions = Arc::new(SessionStore::new(Duration::seconds(config.session_ttl_secs)));
    spawn_eviction_sweep(sessions.clone());

    let sender = Arc::new(WhatsappSender::new(whatsapp.clone())?);
    let customers = Arc::new(db.customers());
    let router = Arc::new(CommandRouter::new(
        Arc::new(db.businesses()),
        customers.clone(),
        sessions,
        registry,
        FallbackMatcher::new(Arc::new(db.faq())),
        Arc::new(db.messages()),
        sender.clone(),
    ));

    let state = AppState {
        router,
        sender,
        customers,
        verify_token: whatsapp.verify_token.clone(),
    };
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("step: serving on {}", config.bind_addr);
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}

/// Periodically drops sessions idle past their TTL.
fn spawn_eviction_sweep(sessions: Arc<SessionStore>) {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(EVICTION_SWEEP_SECS));
        loop {
            interval.tick().await;
            let evicted = sessions.evict_expired();
            if evicted > 0 {
                info!(evicted, "evicted idle sessions");
            }
        }
    });
}
