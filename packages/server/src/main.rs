use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{Level, info};

use server::config::AppConfig;
use server::database::init_db;
use server::state::AppState;
use server::store::{ChefStore, MemoryChefStore, PgChefStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let store: Arc<dyn ChefStore> = match &config.database.url {
        Some(url) => {
            let db = init_db(url, config.database.max_connections)
                .await
                .context("Failed to connect to database")?;
            info!("Using PostgreSQL chef store");
            Arc::new(PgChefStore::new(db))
        }
        None => {
            info!("No database URL configured, using in-memory chef store");
            Arc::new(MemoryChefStore::new())
        }
    };

    let state = AppState::new(config.clone(), store)
        .await
        .context("Failed to prepare upload directories")?;
    let app = server::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    info!("Server running at http://{}", addr);
    info!("API docs at http://{}/scalar", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
