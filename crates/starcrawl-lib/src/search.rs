//! Single-leg path search over the grid index.
//!
//! The search is greedy best-first: the frontier is ordered purely by the
//! straight-line distance to the goal, while a best-known cost per point
//! decides which parent a point is reached through. The result is a feasible
//! route, not necessarily the shortest one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::frontier::{Frontier, SearchStop};
use crate::point::{Point, PointId};
use crate::route::{Route, Stop};
use crate::spatial::GridIndex;

/// Default maximum distance of a single hop.
pub const DEFAULT_MAX_JUMP: f64 = 18.0;
/// Default maximum number of hops in one leg.
pub const DEFAULT_MAX_HOPS: usize = 100;

/// Per-query limits applied to every leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingConstraints {
    /// Hops must be strictly shorter than this.
    pub max_jump: f64,
    pub max_hops: usize,
}

impl Default for RoutingConstraints {
    fn default() -> Self {
        Self {
            max_jump: DEFAULT_MAX_JUMP,
            max_hops: DEFAULT_MAX_HOPS,
        }
    }
}

impl RoutingConstraints {
    pub fn new(max_jump: f64, max_hops: usize) -> Self {
        Self { max_jump, max_hops }
    }
}

/// Search for a route from `from` to `to`.
///
/// Every hop is shorter than `constraints.max_jump` (subject to the index's
/// probe strategy) and the route never exceeds `constraints.max_hops` hops.
pub fn find_path(
    index: &GridIndex,
    from: PointId,
    to: PointId,
    constraints: &RoutingConstraints,
) -> Result<Route> {
    let start = index.lookup(from)?;
    let goal = index.lookup(to)?;

    let mut frontier = Frontier::new(goal.coordinate);
    let mut visited: HashSet<PointId> = HashSet::new();
    let mut queued: HashSet<PointId> = HashSet::new();
    let mut parents: HashMap<PointId, PointId> = HashMap::new();
    let mut best: HashMap<PointId, f64> = HashMap::new();
    // Hop depth through the currently recorded parent chain.
    let mut depth: HashMap<PointId, usize> = HashMap::new();

    best.insert(from, 0.0);
    depth.insert(from, 0);
    queued.insert(from);
    frontier.push(SearchStop {
        point: start,
        hops: 0,
    });

    let mut checks: u64 = 0;
    while let Some(current) = frontier.pop() {
        let id = current.point.id;
        // Reparenting can change a point's depth after it was queued; the
        // depth map holds the hop count of the chain reconstruction will use.
        let hops = depth.get(&id).copied().unwrap_or(current.hops);
        if hops > constraints.max_hops {
            continue;
        }

        checks += 1;
        visited.insert(id);

        if id == to {
            let route = reconstruct(index, &parents, from, to, checks)?;
            debug!(
                from,
                to,
                hops = route.hop_count(),
                checks,
                distance = route.distance,
                "leg found"
            );
            return Ok(route);
        }

        let current_cost = best.get(&id).copied().unwrap_or(0.0);
        for near in index.neighbors_within(&current.point.coordinate, constraints.max_jump) {
            if visited.contains(&near.id) {
                continue;
            }

            let score = current_cost + current.point.distance_to(&near);
            if !queued.contains(&near.id) {
                queued.insert(near.id);
                frontier.push(SearchStop {
                    point: Arc::clone(&near),
                    hops: hops + 1,
                });
            } else if score >= best.get(&near.id).copied().unwrap_or(0.0)
                || hops + 1 > constraints.max_hops
            {
                continue;
            }

            parents.insert(near.id, id);
            best.insert(near.id, score);
            depth.insert(near.id, hops + 1);
        }
    }

    debug!(from, to, checks, "no leg within constraints");
    Err(Error::RouteNotFound {
        start: from,
        goal: to,
    })
}

fn reconstruct(
    index: &GridIndex,
    parents: &HashMap<PointId, PointId>,
    start: PointId,
    goal: PointId,
    checks: u64,
) -> Result<Route> {
    let mut chain: Vec<Arc<Point>> = Vec::new();
    let mut current = goal;
    loop {
        chain.push(index.lookup(current)?);
        if current == start {
            break;
        }
        match parents.get(&current) {
            Some(parent) => current = *parent,
            None => break,
        }
    }
    chain.reverse();

    let mut stops = Vec::with_capacity(chain.len());
    let mut previous: Option<&Arc<Point>> = None;
    for point in &chain {
        let distance = previous.map_or(0.0, |prev| prev.distance_to(point));
        stops.push(Stop::new(Arc::clone(point), distance));
        previous = Some(point);
    }
    Route::from_stops(stops, checks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Coordinate;
    use crate::spatial::GridConfig;

    fn line(count: i64, spacing: f64) -> GridIndex {
        let mut index = GridIndex::new(GridConfig::default()).unwrap();
        for id in 1..=count {
            let x = (id - 1) as f64 * spacing;
            index
                .insert(Point::new(id, format!("L{id}"), Coordinate::new(x, 0.0, 0.0)))
                .unwrap();
        }
        index
    }

    #[test]
    fn walks_a_straight_line() {
        let index = line(5, 10.0);
        let route = find_path(&index, 1, 5, &RoutingConstraints::new(15.0, 10)).unwrap();
        assert_eq!(route.ids(), vec![1, 2, 3, 4, 5]);
        assert_eq!(route.distance, 40.0);
        assert!(route.checks >= 5);
    }

    #[test]
    fn hop_limit_blocks_long_legs() {
        let index = line(5, 10.0);
        let err = find_path(&index, 1, 5, &RoutingConstraints::new(15.0, 3)).unwrap_err();
        assert!(matches!(err, Error::RouteNotFound { start: 1, goal: 5 }));

        let route = find_path(&index, 1, 5, &RoutingConstraints::new(15.0, 4)).unwrap();
        assert_eq!(route.hop_count(), 4);
    }

    #[test]
    fn jump_limit_is_strict() {
        let index = line(2, 10.0);
        assert!(find_path(&index, 1, 2, &RoutingConstraints::new(10.0, 5)).is_err());
        assert!(find_path(&index, 1, 2, &RoutingConstraints::new(10.01, 5)).is_ok());
    }

    #[test]
    fn unknown_endpoints_are_reported() {
        let index = line(2, 1.0);
        let err = find_path(&index, 1, 99, &RoutingConstraints::default()).unwrap_err();
        assert!(matches!(err, Error::PointNotFound { id: 99 }));
    }

    #[test]
    fn default_constraints() {
        let constraints = RoutingConstraints::default();
        assert_eq!(constraints.max_jump, 18.0);
        assert_eq!(constraints.max_hops, 100);
    }
}
