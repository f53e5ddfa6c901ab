use std::sync::Arc;

use anyhow::Context;
use pipedeck_core::lifecycle::RandomOutcome;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod api;
pub mod config;
pub mod db;
pub mod repository;
pub mod seed;
pub mod service;
pub mod worker;

use crate::api::AppState;
use crate::config::ServerConfig;
use crate::worker::ExecutionWorker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pipedeck_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pipedeck server...");

    let config = ServerConfig::from_env();
    config.validate().context("Invalid configuration")?;
    let timing = config.timing()?;

    tracing::info!("Connecting to database...");

    // Create database connection pool
    let pool = db::create_pool(&config.database_url)
        .await
        .context("Failed to create database pool")?;

    tracing::info!("Database connection pool created");

    // Run migrations
    db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    if config.seed_demo_data {
        seed::seed_demo_data(&pool, &timing)
            .await
            .context("Failed to seed demo data")?;
    }

    // Start the execution worker
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker = ExecutionWorker::new(
        pool.clone(),
        timing,
        Arc::new(RandomOutcome::new(config.success_rate)),
        config.worker_poll_interval,
        config.worker_batch_size,
    );
    let worker_handle = tokio::spawn(worker.run(shutdown_rx));

    // Build router with all API endpoints
    let app = api::create_router(AppState { pool, timing });

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("HTTP server stopped, waiting for worker...");
    let _ = shutdown_tx.send(true);
    if let Err(e) = worker_handle.await {
        tracing::warn!("Execution worker task failed: {}", e);
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
