//! starcrawl route planning HTTP service.
//!
//! Configuration comes from the environment; see [`ServiceConfig`] plus
//! `LOG_FORMAT`, `RUST_LOG`, `METRICS_ENABLED` and `METRICS_PATH`.

use std::net::SocketAddr;

use tracing::{error, info, warn};

use starcrawl_service::{
    build_router, init_logging, init_metrics, AppState, LoggingConfig, MetricsConfig,
    ServiceConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::from_env());

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        warn!(error = %e, "continuing without metrics");
    }

    let config = ServiceConfig::from_env();
    info!(
        data_path = %config.data_path.display(),
        port = config.port,
        radius = config.grid.radius,
        probe = %config.grid.probe,
        "starting starcrawl service"
    );

    let state = AppState::load(&config).map_err(|e| {
        error!(error = %e, path = %config.data_path.display(), "failed to load application state");
        e
    })?;
    info!(points = state.atlas().len(), "application state loaded");

    let app = build_router(state, &metrics_config.path);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
