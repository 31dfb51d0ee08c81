//! Query-string types and validation for the HTTP endpoints.

use serde::Deserialize;

use starcrawl_lib::{Atlas, PointId, RoutingConstraints, DEFAULT_SEARCH_LIMIT, UNSPECIFIED};

use crate::problem::{from_lib_error, ProblemDetails};

/// Upper bound on `limit` for `/search`.
pub const MAX_SEARCH_LIMIT: usize = 100;

/// Validation trait for request types.
///
/// Returns a boxed `ProblemDetails` to keep the `Err` variant small.
pub trait Validate {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// `GET /route` parameters. Every field stays a string until validated so
/// malformed numbers become 400 problems rather than extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteQuery {
    /// Start point id or exact name. Empty or `0` leaves it unspecified.
    pub from: Option<String>,
    pub to: Option<String>,
    /// Comma-separated waypoint ids or names, in no particular order.
    pub visit: Option<String>,
    pub max_jump: Option<String>,
    pub max_hops: Option<String>,
}

/// A route query with every reference resolved against the atlas.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub start: PointId,
    pub end: PointId,
    pub waypoints: Vec<PointId>,
    pub constraints: RoutingConstraints,
}

impl RouteQuery {
    /// Resolve names to ids and fill absent limits from `defaults`.
    pub fn resolve(
        &self,
        atlas: &Atlas,
        defaults: &RoutingConstraints,
        request_id: &str,
    ) -> Result<RoutePlan, Box<ProblemDetails>> {
        self.validate(request_id)?;

        let reference = |value: Option<&str>| -> Result<PointId, Box<ProblemDetails>> {
            match value.map(str::trim) {
                None | Some("") | Some("0") => Ok(UNSPECIFIED),
                Some(value) => atlas
                    .resolve(value)
                    .map_err(|e| Box::new(from_lib_error(&e, request_id))),
            }
        };

        let start = reference(self.from.as_deref())?;
        let end = reference(self.to.as_deref())?;
        let waypoints = self
            .visit_entries()
            .map(|entry| reference(Some(entry)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut constraints = *defaults;
        if let Some(max_jump) = non_empty(&self.max_jump) {
            constraints.max_jump = max_jump.parse().unwrap_or(constraints.max_jump);
        }
        if let Some(max_hops) = non_empty(&self.max_hops) {
            constraints.max_hops = max_hops.parse().unwrap_or(constraints.max_hops);
        }

        Ok(RoutePlan {
            start,
            end,
            waypoints,
            constraints,
        })
    }

    fn visit_entries(&self) -> impl Iterator<Item = &str> {
        self.visit
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
    }
}

impl Validate for RouteQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if let Some(raw) = non_empty(&self.max_jump) {
            match raw.parse::<f64>() {
                Ok(value) if value.is_finite() && value > 0.0 => {}
                _ => {
                    return Err(Box::new(ProblemDetails::bad_request(
                        format!("max_jump must be a positive number, got '{raw}'"),
                        request_id,
                    )))
                }
            }
        }
        if let Some(raw) = non_empty(&self.max_hops) {
            match raw.parse::<usize>() {
                Ok(value) if value > 0 => {}
                _ => {
                    return Err(Box::new(ProblemDetails::bad_request(
                        format!("max_hops must be a positive integer, got '{raw}'"),
                        request_id,
                    )))
                }
            }
        }
        Ok(())
    }
}

/// `GET /search` parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)
    }
}

impl Validate for SearchQuery {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if self.q.trim().is_empty() {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'q' parameter is required and cannot be empty",
                request_id,
            )));
        }
        if self.limit() == 0 || self.limit() > MAX_SEARCH_LIMIT {
            return Err(Box::new(ProblemDetails::bad_request(
                format!("limit must be between 1 and {MAX_SEARCH_LIMIT}"),
                request_id,
            )));
        }
        Ok(())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
