//! Prometheus metrics for the starcrawl service.
//!
//! [`init_metrics`] installs the global recorder once at startup and
//! [`metrics_handler`] renders it for scraping. The `record_*` helpers are
//! no-ops until a recorder is installed, so handlers can call them freely.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use thiserror::Error;

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// Reads `METRICS_ENABLED` (anything but `false` enables) and `METRICS_PATH`.
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| v.to_lowercase() != "false")
            .unwrap_or(true);
        let path = std::env::var("METRICS_PATH").unwrap_or_else(|_| "/metrics".to_string());
        Self { enabled, path }
    }
}

#[derive(Debug, Clone, Error)]
pub enum MetricsError {
    #[error("metrics are disabled")]
    Disabled,
    #[error("metrics recorder already initialized")]
    AlreadyInitialized,
    #[error("failed to install metrics recorder: {0}")]
    InstallFailed(String),
}

/// Install the Prometheus recorder. Only the first call can succeed.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(|h| h.render())
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Count a successfully planned itinerary and record its size.
pub fn record_route_planned(stops: usize, waypoints: usize) {
    metrics::counter!("starcrawl_routes_planned_total").increment(1);
    metrics::histogram!("starcrawl_route_stops").record(stops as f64);
    metrics::histogram!("starcrawl_route_waypoints").record(waypoints as f64);
}

/// Count a failed planning request. `reason` is a short stable label such
/// as `no_path`, `unknown_point` or `invalid_request`.
pub fn record_route_failed(reason: &'static str) {
    metrics::counter!("starcrawl_routes_failed_total", "reason" => reason).increment(1);
}

pub fn record_search(matches: usize) {
    metrics::counter!("starcrawl_searches_total").increment(1);
    metrics::histogram!("starcrawl_search_matches").record(matches as f64);
}

pub fn record_http_request(method: &str, path: &str, status: &'static str, seconds: f64) {
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(seconds);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_refuses_to_install() {
        let config = MetricsConfig {
            enabled: false,
            ..MetricsConfig::default()
        };
        assert!(matches!(init_metrics(&config), Err(MetricsError::Disabled)));
    }

    #[test]
    fn helpers_are_safe_without_a_recorder() {
        record_route_planned(3, 1);
        record_route_failed("no_path");
        record_search(2);
        record_http_request("GET", "/route", "2xx", 0.01);
    }
}
