//! Request correlation and HTTP metrics.
//!
//! [`track_requests`] runs around every handler. It takes the caller's
//! `X-Request-ID` or generates a UUID v7, opens a span carrying it, records
//! `http_requests_total` and `http_request_duration_seconds`, and echoes
//! the id back on the response.

use std::convert::Infallible;
use std::time::Instant;

use axum::{
    extract::{FromRequestParts, MatchedPath, Request},
    http::{request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::metrics::record_http_request;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id of the request being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Time-sortable UUID v7.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(|| extract_or_generate_request_id(&parts.headers)))
    }
}

/// The `X-Request-ID` header if present and non-empty, else a fresh id.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(RequestId::new)
        .unwrap_or_else(RequestId::generate)
}

/// Strip the query string so metric labels stay low-cardinality.
pub fn normalize_path(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

pub async fn track_requests(mut request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = extract_or_generate_request_id(request.headers());
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| normalize_path(request.uri().path()).to_string());

    request.extensions_mut().insert(request_id.clone());
    let span = info_span!("request", request_id = %request_id, %method, %path);

    let mut response = next.run(request).instrument(span).await;

    record_http_request(
        &method,
        &path,
        status_bucket(response.status().as_u16()),
        start.elapsed().as_secs_f64(),
    );
    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
