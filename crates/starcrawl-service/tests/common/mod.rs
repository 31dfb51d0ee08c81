#![allow(dead_code)]

use std::path::PathBuf;

use axum::{body::Body, http::Request, Router};
use serde_json::Value;
use tower::ServiceExt;

use starcrawl_service::{build_router, AppState, ServiceConfig};

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/sample_points.csv")
}

pub fn fixture_state() -> AppState {
    let config = ServiceConfig {
        data_path: fixture_path(),
        ..ServiceConfig::default()
    };
    AppState::load(&config).expect("fixture dataset loads")
}

pub fn app() -> Router {
    build_router(fixture_state(), "/metrics")
}

/// Issue a GET and return the status, the `X-Request-ID` header, and the body as JSON.
pub async fn get_json(app: Router, uri: &str) -> (u16, Option<String>, Value) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
        .await
        .expect("router is infallible");

    let status = response.status().as_u16();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, request_id, body)
}

pub fn stop_ids(route: &Value) -> Vec<i64> {
    route["Stops"]
        .as_array()
        .expect("stops array")
        .iter()
        .map(|stop| stop["Point"]["id"].as_i64().expect("numeric id"))
        .collect()
}
