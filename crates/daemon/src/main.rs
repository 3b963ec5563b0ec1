//! Fastq Unarchiving Job Manager - Main Entry Point

mod settings;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use settings::Settings;
use unarchive_api_rpc::RpcServer;
use unarchive_core::application::{ExpiryScheduler, UnarchiveService};
use unarchive_core::port::id_provider::UlidProvider;
use unarchive_core::port::time_provider::SystemTimeProvider;
use unarchive_infra_events::build_publisher;
use unarchive_infra_sqlite::{create_pool, run_migrations, SqliteJobExpiry, SqliteJobStore};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging(log_format: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("unarchive=info"))
        .context("Failed to create env filter")?;

    match log_format {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let settings = Settings::load().context("Invalid configuration")?;

    // 2. Initialize logging
    init_logging(&settings.log_format)?;
    info!("Fastq unarchiving manager v{} starting...", VERSION);

    // 3. Initialize database
    info!(database_url = %settings.database_url, "Initializing database...");
    let pool = create_pool(&settings.database_url)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UlidProvider::new(settings.id_prefix.clone()));
    let store = Arc::new(SqliteJobStore::new(pool.clone()));
    let publisher = build_publisher(&settings.event_bus)
        .map_err(|e| anyhow::anyhow!("Event bus setup failed: {}", e))?;
    info!(bus = %settings.event_bus.bus_name, "Event publisher ready");

    let service = Arc::new(UnarchiveService::new(
        store,
        publisher,
        id_provider,
        time_provider.clone(),
        settings.service_config(),
    ));

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let (addr, rpc_handle) = RpcServer::new(settings.rpc_config(), service)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    // 6. Start expiry purge
    let purge_handle = settings.purge_interval().map(|period| {
        let scheduler = ExpiryScheduler::new(
            Arc::new(SqliteJobExpiry::new(pool.clone())),
            time_provider,
            period,
        );
        tokio::spawn(scheduler.run())
    });
    if purge_handle.is_none() {
        info!("Expiry purge disabled");
    }

    info!(addr = %addr, "System ready");
    info!("Press Ctrl+C to shutdown");

    // 7. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    if let Some(handle) = purge_handle {
        handle.abort();
    }
    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;
    pool.close().await;

    info!("Shutdown complete.");

    Ok(())
}
