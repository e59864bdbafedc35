//! # Keystone Server
//!
//! Main entry point: loads configuration, connects to PostgreSQL and Redis,
//! and serves the REST API until a shutdown signal arrives.

use anyhow::Context;
use keystone_config::{AppConfig, ConfigLoader};
use keystone_rest::create_router;
use keystone_server::{
    di::{build_app_module, ServerResolver},
    startup::{init_logging, print_startup_info, shutdown_signal},
};
use std::net::SocketAddr;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.into_config(),
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);

    info!("Starting Keystone Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let module = build_app_module(&config)
        .await
        .context("failed to initialize dependencies")?;

    let db_pool = module.database_pool();
    if config.database.run_migrations {
        db_pool
            .run_migrations()
            .await
            .context("failed to run migrations")?;
    }

    let router = create_router(module.as_ref(), &config.server);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    print_startup_info(&config);
    info!("Starting REST server on http://{}", addr);

    // Peer addresses key the per-client rate limiter.
    axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("REST server error")?;

    db_pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}
