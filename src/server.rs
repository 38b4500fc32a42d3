//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, event channels, worker spawning, and Axum server lifecycle.

use crate::application::resilience::ResilientUrlService;
use crate::application::services::{AdmissionController, EventPublisher, UrlLifecycleService};
use crate::config::Config;
use crate::domain::analytics_event::AnalyticsEvent;
use crate::domain::analytics_worker::run_analytics_worker;
use crate::domain::repositories::MappingStore;
use crate::infrastructure::store::{InMemoryMappingStore, RedisMappingStore};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::CodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Wires services around `store` and returns the state plus the receiving end
/// of the analytics queue.
pub fn build_state(
    config: &Config,
    store: Arc<dyn MappingStore>,
) -> (AppState, mpsc::Receiver<AnalyticsEvent>) {
    let (analytics_tx, analytics_rx) = mpsc::channel(config.analytics_queue_capacity);
    let (live_tx, _) = broadcast::channel(config.live_channel_capacity);
    let events = EventPublisher::new(analytics_tx, live_tx);

    let lifecycle = UrlLifecycleService::new(
        store.clone(),
        Arc::new(CodeGenerator::new()),
        events.clone(),
    );
    let url_service = ResilientUrlService::new(Arc::new(lifecycle), config.resilience_config());
    let admission = AdmissionController::new(config.admission_config());

    let state = AppState::new(
        Arc::new(url_service),
        Arc::new(admission),
        events,
        store,
        config.base_url.clone(),
        config.behind_proxy,
    );

    (state, analytics_rx)
}

/// Opens the configured mapping store.
///
/// # Errors
///
/// Returns an error if Redis is configured but unreachable. There is no
/// silent fallback to memory: mappings written there would vanish on restart.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn MappingStore>> {
    match &config.redis_url {
        Some(redis_url) => {
            let store = RedisMappingStore::connect(redis_url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Store: Redis");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("REDIS_URL not set, mappings are kept in memory only");
            Ok(Arc::new(InMemoryMappingStore::new()))
        }
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Mapping store (Redis or in-memory)
/// - Analytics queue and live-update channel
/// - Background analytics worker
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Redis connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = connect_store(&config).await?;

    let (state, analytics_rx) = build_state(&config, store);

    let worker = tokio::spawn(run_analytics_worker(analytics_rx));
    tracing::info!("Analytics worker started");

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router owned the last senders; the worker drains what is queued and exits.
    match worker.await {
        Ok(summary) => tracing::info!(
            shortens = summary.shortens,
            clicks = summary.clicks,
            "Analytics worker stopped"
        ),
        Err(e) => tracing::error!("Analytics worker failed: {}", e),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
