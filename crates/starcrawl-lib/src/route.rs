use std::sync::Arc;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::point::{Point, PointId};

/// One stop along a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Stop {
    pub point: Arc<Point>,
    pub distance_from_previous: f64,
    /// `true` for explicitly requested endpoints and waypoints, `false` for
    /// pass-through stops chosen by the search.
    #[serde(rename = "RequestedStop")]
    pub requested: bool,
}

impl Stop {
    pub fn new(point: Arc<Point>, distance_from_previous: f64) -> Self {
        Self {
            point,
            distance_from_previous,
            requested: false,
        }
    }

    pub fn id(&self) -> PointId {
        self.point.id
    }
}

/// An ordered sequence of stops from an origin to a destination.
///
/// `origin` and `destination` always mirror the first and last entries of
/// `stops`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Route {
    pub origin: Stop,
    pub destination: Stop,
    pub stops: Vec<Stop>,
    pub distance: f64,
    /// Number of frontier states examined while producing the route.
    pub checks: u64,
}

impl Route {
    /// Route consisting of one stop and no travel.
    pub fn single(point: Arc<Point>, requested: bool) -> Self {
        let mut stop = Stop::new(point, 0.0);
        stop.requested = requested;
        Self {
            origin: stop.clone(),
            destination: stop.clone(),
            stops: vec![stop],
            distance: 0.0,
            checks: 0,
        }
    }

    /// Assemble a route from consecutive stops, totalling their distances.
    pub fn from_stops(stops: Vec<Stop>, checks: u64) -> Result<Self> {
        let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
            return Err(Error::LegMerge {
                message: "a route needs at least one stop".to_string(),
            });
        };
        let origin = first.clone();
        let destination = last.clone();
        let distance = stops.iter().skip(1).map(|s| s.distance_from_previous).sum();
        Ok(Self {
            origin,
            destination,
            stops,
            distance,
            checks,
        })
    }

    /// Append `next` onto this route.
    ///
    /// The first stop of `next` must be the current destination; it is not
    /// repeated. Distances and checks are summed.
    pub fn merge(mut self, next: Route) -> Result<Route> {
        let Some(joint) = next.stops.first() else {
            return Err(Error::LegMerge {
                message: "cannot append an empty leg".to_string(),
            });
        };
        let Some(tail) = self.stops.last() else {
            return Err(Error::LegMerge {
                message: "cannot extend an empty route".to_string(),
            });
        };
        if joint.id() != tail.id() {
            return Err(Error::LegMerge {
                message: format!(
                    "leg starts at {} but the route ends at {}",
                    joint.id(),
                    tail.id()
                ),
            });
        }

        // A requested joint stays requested whichever side flagged it.
        let joint_requested = joint.requested;
        if let Some(tail) = self.stops.last_mut() {
            tail.requested |= joint_requested;
        }

        self.stops.extend(next.stops.into_iter().skip(1));
        self.distance += next.distance;
        self.checks += next.checks;
        self.sync_endpoints();
        Ok(self)
    }

    /// Flag the first and last stops as explicitly requested.
    pub fn mark_endpoints_requested(&mut self) {
        if let Some(first) = self.stops.first_mut() {
            first.requested = true;
        }
        if let Some(last) = self.stops.last_mut() {
            last.requested = true;
        }
        self.sync_endpoints();
    }

    pub fn hop_count(&self) -> usize {
        self.stops.len().saturating_sub(1)
    }

    /// Point ids in travel order.
    pub fn ids(&self) -> Vec<PointId> {
        self.stops.iter().map(Stop::id).collect()
    }

    fn sync_endpoints(&mut self) {
        if let Some(first) = self.stops.first() {
            self.origin = first.clone();
        }
        if let Some(last) = self.stops.last() {
            self.destination = last.clone();
        }
    }
}
