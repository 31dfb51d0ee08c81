//! Liveness and readiness probes.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `ok`, or `not_ready: <reason>`.
    pub status: String,
    pub service: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_loaded: Option<usize>,
    /// Probe strategy the spatial index answers radius queries with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe: Option<String>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            points_loaded: None,
            probe: None,
        }
    }

    pub fn ready(service: &str, version: &str, points: usize, probe: &str) -> Self {
        Self {
            points_loaded: Some(points),
            probe: Some(probe.to_string()),
            ..Self::alive(service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {reason}"),
            ..Self::alive(service, version)
        }
    }
}

pub async fn health_live() -> impl IntoResponse {
    let status = HealthStatus::alive(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    (StatusCode::OK, Json(status))
}

/// 503 until at least one point is indexed.
pub async fn health_ready(State(state): State<AppState>) -> Response {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");
    let atlas = state.atlas();

    if atlas.is_empty() {
        let status = HealthStatus::not_ready(service, version, "no points loaded");
        return (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response();
    }

    let probe = atlas.index().config().probe;
    let status = HealthStatus::ready(service, version, atlas.len(), probe.as_str());
    (StatusCode::OK, Json(status)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alive_omits_dataset_fields() {
        let json = serde_json::to_string(&HealthStatus::alive("svc", "1.0")).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(!json.contains("points_loaded"));
        assert!(!json.contains("probe"));
    }

    #[test]
    fn ready_reports_counts() {
        let status = HealthStatus::ready("svc", "1.0", 10, "cube");
        assert_eq!(status.points_loaded, Some(10));
        assert_eq!(status.probe.as_deref(), Some("cube"));
    }

    #[test]
    fn not_ready_carries_reason() {
        let status = HealthStatus::not_ready("svc", "1.0", "no points loaded");
        assert_eq!(status.status, "not_ready: no points loaded");
        assert!(status.points_loaded.is_none());
    }
}
