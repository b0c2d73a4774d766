//! Medq Queue Engine - Main Entry Point
//!
//! Wires the SQLite adapters into the core use cases and serves them over
//! JSON-RPC for the front-desk clients.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use medq_api_rpc::{RpcServer, RpcServerConfig};
use medq_core::application::QueueSettings;
use medq_core::port::id_provider::UuidProvider;
use medq_core::port::time_provider::SystemTimeProvider;
use medq_infra_sqlite::{
    create_pool, run_migrations, SqliteAuditSink, SqliteDirectoryStore, SqliteQueueRepository,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_DB_PATH: &str = "~/.medq/queue.db";

fn env_i64(name: &str, default: i64) -> i64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    let log_format = std::env::var("MEDQ_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("medq=info"))
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    info!("Medq Queue Engine v{} starting...", VERSION);

    // 2. Load configuration
    let db_path = std::env::var("MEDQ_DB_PATH")
        .unwrap_or_else(|_| shellexpand::tilde(DEFAULT_DB_PATH).into_owned());

    let rpc_host =
        std::env::var("MEDQ_RPC_HOST").unwrap_or_else(|_| RpcServerConfig::default().host);

    let rpc_port: u16 = std::env::var("MEDQ_RPC_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| RpcServerConfig::default().port);

    let settings = QueueSettings {
        utc_offset_minutes: env_i64("MEDQ_UTC_OFFSET_MINUTES", 0) as i32,
        default_consultation_minutes: env_i64("MEDQ_DEFAULT_CONSULT_MINUTES", 15),
        ..Default::default()
    };

    info!(db_path = %db_path, "Initializing database...");

    // 3. Initialize database
    let pool = create_pool(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Setup dependencies (DI wiring)
    let time_provider = Arc::new(SystemTimeProvider);
    let id_provider = Arc::new(UuidProvider);
    let queue_repo = Arc::new(SqliteQueueRepository::new(pool.clone()));
    let tx_queue_repo = Arc::new(SqliteQueueRepository::new(pool.clone()));
    let directory = Arc::new(SqliteDirectoryStore::new(pool.clone()));
    let audit = Arc::new(SqliteAuditSink::new(pool.clone(), time_provider.clone()));

    // 5. Start JSON-RPC server
    info!("Starting JSON-RPC server...");
    let rpc_config = RpcServerConfig {
        host: rpc_host,
        port: rpc_port,
    };
    let rpc_server = RpcServer::new(
        rpc_config,
        tx_queue_repo,
        queue_repo,
        directory,
        audit,
        id_provider,
        time_provider,
        settings,
    );
    let rpc_handle = rpc_server
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!("System ready. Waiting for queue operations...");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;

    info!("Shutdown complete.");

    Ok(())
}
