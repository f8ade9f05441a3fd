//! Product Cache - cache-aside product service
//!
//! Serves product CRUD over HTTP, reading through an in-process or Redis
//! cache in front of the product store.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use product_cache::api::{create_router, AppState};
use product_cache::cache::{CacheBackend, MemoryBackend, RedisBackend};
use product_cache::config::{BackendKind, Config};
use product_cache::store::InMemoryStore;
use product_cache::{spawn_cleanup_task, ProductCacheService};

/// Main entry point for the product cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the configured cache backend (Redis degrades to disabled)
/// 4. Start the memory backend's sweep task, if applicable
/// 5. Wire store, cache and service into the Axum router
/// 6. Serve until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "product_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Product Cache Service");

    let config = Config::from_env();
    info!(
        "Configuration loaded: backend={:?}, port={}, ttl={:?}, collection_policy={:?}",
        config.cache_backend,
        config.server_port,
        config.ttl_policy(),
        config.collection_policy
    );

    let (cache, cleanup_handle) = build_backend(&config).await;
    info!("Cache backend '{}' initialized", cache.name());

    let store = Arc::new(InMemoryStore::new());
    let service = ProductCacheService::new(store, cache, config.ttl_policy())
        .with_collection_policy(config.collection_policy);
    let app = create_router(AppState::new(service));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Builds the configured backend, plus the sweep task for the memory variant.
///
/// An unreachable Redis is not fatal: the service runs against a disabled
/// backend and every read falls through to the store.
async fn build_backend(config: &Config) -> (Arc<dyn CacheBackend>, Option<JoinHandle<()>>) {
    match config.cache_backend {
        BackendKind::Memory => {
            let memory = Arc::new(MemoryBackend::new(config.max_entries));
            let handle = spawn_cleanup_task(memory.clone(), config.cleanup_interval);
            (memory, Some(handle))
        }
        BackendKind::Redis => {
            match RedisBackend::connect(&config.redis_url, config.redis_timeout()).await {
                Ok(redis) => (Arc::new(redis), None),
                Err(e) => {
                    warn!("Redis unavailable ({}); serving from the store only", e);
                    (Arc::new(RedisBackend::disabled()), None)
                }
            }
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweeper.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = cleanup_handle {
        handle.abort();
        info!("Cache sweep task stopped");
    }
}
