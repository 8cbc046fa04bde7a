use std::sync::Arc;

use anyhow::{Context, Result};
use dotenv::dotenv;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qaforum::api::{self, AppState};
use qaforum::db::{self, ForumStore, MemoryStore, PgStore};
use qaforum::{ServerConfig, StoreBackend};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let config = ServerConfig::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Q&A forum API...");

    let store = open_store(config.backend).await?;
    info!("Store ready ({})", store.backend_name());

    let state = Arc::new(AppState::new(store.clone()));

    // Permissive CORS, applied ahead of every handler
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    // Layers wrap bottom-up: cors sees requests first
    let app = api::create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Q&A forum API listening on http://{}", addr);
    api::print_routes();

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.close().await;
    info!("Store closed");

    if let Err(e) = served {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Q&A forum API shut down gracefully");

    Ok(())
}

/// Opens the configured store backend
async fn open_store(backend: StoreBackend) -> Result<Arc<dyn ForumStore>> {
    match backend {
        StoreBackend::Postgres => {
            let db_config = db::DbConfig::from_env()?;
            let pool = db::connect_db(&db_config).await?;

            if !db::connection::check_connection(&pool).await {
                error!("Database connection check failed");
                return Err(anyhow::anyhow!("Failed to connect to database"));
            }

            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    info!("Shutdown signal received...");
}
