#![deny(warnings)]

//! HTTP front end for starcrawl.
//!
//! # Endpoints
//!
//! - `GET /route?from=&to=&visit=&max_jump=&max_hops=` plans an itinerary
//! - `GET /search?q=&limit=` autocompletes point names
//! - `GET /points/{id}` returns one point
//! - `GET /health/live`, `GET /health/ready` for probes
//! - `GET /metrics` in Prometheus text format
//!
//! Errors are RFC 9457 problem documents.

pub mod config;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod problem;
pub mod request;
pub mod routes;
pub mod state;

use axum::{http::Method, middleware::from_fn, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::ServiceConfig;
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{init_metrics, metrics_handler, MetricsConfig, MetricsError};
pub use middleware::{track_requests, RequestId};
pub use problem::{from_lib_error, ProblemDetails};
pub use request::{RouteQuery, SearchQuery, Validate};
pub use state::{AppState, AppStateError};

/// Assemble the application router around `state`.
pub fn build_router(state: AppState, metrics_path: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/route", get(routes::route_handler))
        .route("/search", get(routes::search_handler))
        .route("/points/{id}", get(routes::point_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .route(metrics_path, get(metrics_handler))
        .layer(from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
