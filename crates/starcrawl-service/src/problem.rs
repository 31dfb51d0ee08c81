//! RFC 9457 Problem Details for HTTP APIs.
//!
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use starcrawl_lib::Error as LibError;

pub const PROBLEM_UNKNOWN_POINT: &str = "/problems/unknown-point";
pub const PROBLEM_ROUTE_NOT_FOUND: &str = "/problems/route-not-found";
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

/// Error body returned by every failing endpoint.
///
/// ```
/// use starcrawl_service::problem::{ProblemDetails, PROBLEM_UNKNOWN_POINT};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(PROBLEM_UNKNOWN_POINT, "Unknown Point", StatusCode::NOT_FOUND)
///     .with_detail("unknown point name: Soll. Did you mean 'Sol'?")
///     .with_request_id("req-12345");
/// assert_eq!(problem.status, 404);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_uri: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Request id of the failing call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    pub fn unknown_point(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_UNKNOWN_POINT, "Unknown Point", StatusCode::NOT_FOUND)
            .with_detail(detail)
            .with_request_id(request_id)
    }

    pub fn route_not_found(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_ROUTE_NOT_FOUND,
            "Route Not Found",
            StatusCode::NOT_FOUND,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.detail.as_deref().unwrap_or(""))
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = Json(&self).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        *response.status_mut() = status;
        response
    }
}

/// Map a library error onto the problem a client should see.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::UnknownPointName { .. } | LibError::PointNotFound { .. } => {
            ProblemDetails::unknown_point(error.to_string(), request_id)
        }
        LibError::RouteNotFound { .. } | LibError::EmptyItinerary => {
            ProblemDetails::route_not_found(error.to_string(), request_id)
        }
        LibError::InvalidQuery { message } => ProblemDetails::bad_request(message.clone(), request_id),
        _ => ProblemDetails::internal_error(error.to_string(), request_id),
    }
}
