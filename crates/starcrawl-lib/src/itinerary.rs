//! Multi-waypoint itinerary planning.
//!
//! Every ordering of the requested waypoints is a candidate variant. The
//! variants are solved in parallel against the shared index and the one
//! with the smallest total distance wins. Exhaustive ordering keeps this
//! practical only for a handful of waypoints, so the count is capped.

use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::point::{Point, PointId, UNSPECIFIED};
use crate::route::Route;
use crate::search::{find_path, RoutingConstraints};
use crate::spatial::GridIndex;

/// Default cap on the number of unordered waypoints per query.
pub const DEFAULT_MAX_WAYPOINTS: usize = 8;

/// Tuning knobs for [`Planner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Queries with more waypoints than this are rejected.
    pub max_waypoints: usize,
    /// Size of a dedicated worker pool. `None` uses the global rayon pool.
    pub worker_threads: Option<usize>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_waypoints: DEFAULT_MAX_WAYPOINTS,
            worker_threads: None,
        }
    }
}

/// Plans itineraries over a read-only [`GridIndex`].
pub struct Planner {
    index: Arc<GridIndex>,
    config: PlannerConfig,
    pool: Option<ThreadPool>,
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("points", &self.index.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Planner {
    pub fn new(index: Arc<GridIndex>, config: PlannerConfig) -> Result<Self> {
        let pool = match config.worker_threads {
            Some(threads) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|n| format!("starcrawl-planner-{n}"))
                    .build()?,
            ),
            None => None,
        };
        Ok(Self {
            index,
            config,
            pool,
        })
    }

    pub fn index(&self) -> &Arc<GridIndex> {
        &self.index
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Look up a point by id.
    pub fn lookup(&self, id: PointId) -> Result<Arc<Point>> {
        self.index.lookup(id)
    }

    /// Plan the shortest itinerary from `start` to `end` through every id in
    /// `waypoints`, visiting the waypoints in whichever order is shortest.
    ///
    /// [`UNSPECIFIED`] leaves `start` or `end` open. With no waypoints and
    /// exactly one endpoint the result is that single stop.
    pub fn plan_route(
        &self,
        start: PointId,
        end: PointId,
        waypoints: &[PointId],
        constraints: &RoutingConstraints,
    ) -> Result<Route> {
        if waypoints.len() > self.config.max_waypoints {
            return Err(Error::InvalidQuery {
                message: format!(
                    "{} waypoints requested but at most {} are supported",
                    waypoints.len(),
                    self.config.max_waypoints
                ),
            });
        }
        if waypoints.contains(&UNSPECIFIED) {
            return Err(Error::InvalidQuery {
                message: "waypoint id 0 is reserved".to_string(),
            });
        }
        for id in [start, end]
            .into_iter()
            .filter(|id| *id != UNSPECIFIED)
            .chain(waypoints.iter().copied())
        {
            self.index.lookup(id)?;
        }

        if waypoints.is_empty() {
            match (start != UNSPECIFIED, end != UNSPECIFIED) {
                (false, false) => return Err(Error::EmptyItinerary),
                (true, false) => return Ok(Route::single(self.index.lookup(start)?, true)),
                (false, true) => return Ok(Route::single(self.index.lookup(end)?, true)),
                (true, true) => {}
            }
        }

        let candidates = variants(start, end, waypoints);
        debug!(
            start,
            end,
            waypoints = waypoints.len(),
            variants = candidates.len(),
            "planning itinerary"
        );

        let index = &self.index;
        let solve = || {
            candidates
                .par_iter()
                .enumerate()
                .filter_map(|(order, ids)| match solve_variant(index, ids, constraints) {
                    Ok(route) => Some((order, route)),
                    Err(err) => {
                        warn!(variant = ?ids, error = %err, "itinerary variant failed");
                        None
                    }
                })
                .reduce_with(shorter)
        };
        let best = match &self.pool {
            Some(pool) => pool.install(solve),
            None => solve(),
        };

        match best {
            Some((order, route)) => {
                info!(
                    variant = order,
                    stops = route.stops.len(),
                    distance = route.distance,
                    checks = route.checks,
                    "itinerary planned"
                );
                Ok(route)
            }
            None => Err(Error::RouteNotFound {
                start,
                goal: end,
            }),
        }
    }
}

/// Every visiting order of `waypoints`, with `start` prepended and `end`
/// appended when they are set.
///
/// `w` waypoints always yield `w!` variants.
pub fn variants(start: PointId, end: PointId, waypoints: &[PointId]) -> Vec<Vec<PointId>> {
    permutations(waypoints)
        .into_iter()
        .map(|order| {
            let mut ids = Vec::with_capacity(order.len() + 2);
            if start != UNSPECIFIED {
                ids.push(start);
            }
            ids.extend(order);
            if end != UNSPECIFIED {
                ids.push(end);
            }
            ids
        })
        .collect()
}

fn permutations(items: &[PointId]) -> Vec<Vec<PointId>> {
    if items.is_empty() {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for (position, first) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(position);
        for tail in permutations(&rest) {
            let mut order = Vec::with_capacity(items.len());
            order.push(*first);
            order.extend(tail);
            out.push(order);
        }
    }
    out
}

/// Solve one variant leg by leg and fold the legs into a single route.
fn solve_variant(
    index: &GridIndex,
    ids: &[PointId],
    constraints: &RoutingConstraints,
) -> Result<Route> {
    if let [only] = ids {
        return Ok(Route::single(index.lookup(*only)?, true));
    }

    let mut itinerary: Option<Route> = None;
    for pair in ids.windows(2) {
        let mut leg = find_path(index, pair[0], pair[1], constraints)?;
        leg.mark_endpoints_requested();
        itinerary = Some(match itinerary {
            Some(route) => route.merge(leg)?,
            None => leg,
        });
    }

    itinerary.ok_or_else(|| Error::LegMerge {
        message: "variant has no legs".to_string(),
    })
}

/// Keep the shorter route; equal distances favour the earlier variant.
fn shorter(a: (usize, Route), b: (usize, Route)) -> (usize, Route) {
    match a.1.distance.total_cmp(&b.1.distance) {
        std::cmp::Ordering::Less => a,
        std::cmp::Ordering::Greater => b,
        std::cmp::Ordering::Equal => {
            if a.0 <= b.0 {
                a
            } else {
                b
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_count_is_factorial() {
        assert_eq!(variants(1, 2, &[]).len(), 1);
        assert_eq!(variants(1, 2, &[3]).len(), 1);
        assert_eq!(variants(1, 2, &[3, 4, 5]).len(), 6);
        assert_eq!(variants(UNSPECIFIED, UNSPECIFIED, &[3, 4, 5, 6]).len(), 24);
    }

    #[test]
    fn variants_wrap_waypoints_with_set_endpoints() {
        assert_eq!(
            variants(1, 9, &[3, 4]),
            vec![vec![1, 3, 4, 9], vec![1, 4, 3, 9]]
        );
        assert_eq!(variants(UNSPECIFIED, 9, &[3]), vec![vec![3, 9]]);
        assert_eq!(variants(1, UNSPECIFIED, &[3]), vec![vec![1, 3]]);
    }

    #[test]
    fn ties_keep_the_earlier_variant() {
        use crate::point::Coordinate;
        let point = Arc::new(Point::new(1, "A", Coordinate::new(0.0, 0.0, 0.0)));
        let a = (0, Route::single(Arc::clone(&point), true));
        let b = (1, Route::single(point, true));
        assert_eq!(shorter(b.clone(), a.clone()).0, 0);
        assert_eq!(shorter(a, b).0, 0);
    }
}
