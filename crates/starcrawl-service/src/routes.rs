//! Query handlers: route planning, autocomplete and point lookup.

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn};

use starcrawl_lib::{Error as LibError, PointId};

use crate::metrics::{record_route_failed, record_route_planned, record_search};
use crate::middleware::RequestId;
use crate::problem::{from_lib_error, ProblemDetails};
use crate::request::{RouteQuery, SearchQuery, Validate};
use crate::state::AppState;

/// `GET /route`
///
/// Planning is CPU-bound and fans out over rayon, so it runs on the
/// blocking pool rather than an async worker.
pub async fn route_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    Query(query): Query<RouteQuery>,
) -> Response {
    let plan = match query.resolve(state.atlas(), state.defaults(), request_id.as_str()) {
        Ok(plan) => plan,
        Err(problem) => {
            record_route_failed(if problem.status == 400 {
                "invalid_request"
            } else {
                "unknown_point"
            });
            return problem.into_response();
        }
    };

    info!(
        start = plan.start,
        end = plan.end,
        waypoints = plan.waypoints.len(),
        max_jump = plan.constraints.max_jump,
        max_hops = plan.constraints.max_hops,
        "planning route"
    );

    let worker_state = state.clone();
    let waypoint_count = plan.waypoints.len();
    let outcome = tokio::task::spawn_blocking(move || {
        worker_state
            .atlas()
            .plan_route(plan.start, plan.end, &plan.waypoints, &plan.constraints)
    })
    .await;

    match outcome {
        Ok(Ok(route)) => {
            record_route_planned(route.stops.len(), waypoint_count);
            Json(route).into_response()
        }
        Ok(Err(e)) => {
            warn!(error = %e, "route planning failed");
            record_route_failed(failure_reason(&e));
            from_lib_error(&e, request_id.as_str()).into_response()
        }
        Err(join_error) => {
            error!(error = %join_error, "route planning task aborted");
            record_route_failed("internal_error");
            ProblemDetails::internal_error("route planning was interrupted", request_id.as_str())
                .into_response()
        }
    }
}

/// `GET /search`
pub async fn search_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    Query(query): Query<SearchQuery>,
) -> Response {
    if let Err(problem) = query.validate(request_id.as_str()) {
        return problem.into_response();
    }
    let matches = state.atlas().search(&query.q, query.limit());
    record_search(matches.len());
    Json(matches).into_response()
}

/// `GET /points/{id}`
pub async fn point_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(id): Path<String>,
) -> Response {
    let Ok(id) = id.trim().parse::<PointId>() else {
        return ProblemDetails::bad_request(
            format!("point id must be an integer, got '{id}'"),
            request_id.as_str(),
        )
        .into_response();
    };
    match state.atlas().lookup(id) {
        Ok(point) => Json(point.as_ref()).into_response(),
        Err(e) => from_lib_error(&e, request_id.as_str()).into_response(),
    }
}

fn failure_reason(error: &LibError) -> &'static str {
    match error {
        LibError::RouteNotFound { .. } => "no_path",
        LibError::EmptyItinerary => "empty_itinerary",
        LibError::PointNotFound { .. } | LibError::UnknownPointName { .. } => "unknown_point",
        LibError::InvalidQuery { .. } => "invalid_request",
        _ => "internal_error",
    }
}
