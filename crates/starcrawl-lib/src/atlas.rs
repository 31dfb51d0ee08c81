use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::dataset::PointStore;
use crate::error::Result;
use crate::itinerary::{Planner, PlannerConfig};
use crate::names::{NameIndex, NameMatch};
use crate::point::{Point, PointId};
use crate::route::Route;
use crate::search::RoutingConstraints;
use crate::spatial::{GridConfig, GridIndex};

/// Everything a consumer needs to answer queries: the spatial index, the
/// itinerary planner over it, and the name lookup.
///
/// Built once at startup and read-only afterwards.
#[derive(Debug)]
pub struct Atlas {
    planner: Planner,
    names: NameIndex,
}

impl Atlas {
    /// Build with the default planner configuration.
    pub fn build(store: &PointStore, grid: GridConfig) -> Result<Self> {
        Self::build_with(store, grid, PlannerConfig::default())
    }

    /// Build the index and name lookup from `store`. Fails on the first
    /// point that cannot be indexed.
    pub fn build_with(store: &PointStore, grid: GridConfig, planner: PlannerConfig) -> Result<Self> {
        let index = Arc::new(GridIndex::build(grid, store)?);
        let names = NameIndex::from_store(store);
        let planner = Planner::new(index, planner)?;
        info!(points = names.len(), "atlas ready");
        Ok(Self { planner, names })
    }

    /// Load a dataset from disk and build from it.
    pub fn load(path: &Path, grid: GridConfig, planner: PlannerConfig) -> Result<Self> {
        let store = PointStore::load(path)?;
        Self::build_with(&store, grid, planner)
    }

    pub fn plan_route(
        &self,
        start: PointId,
        end: PointId,
        waypoints: &[PointId],
        constraints: &RoutingConstraints,
    ) -> Result<Route> {
        self.planner.plan_route(start, end, waypoints, constraints)
    }

    pub fn lookup(&self, id: PointId) -> Result<Arc<Point>> {
        self.planner.lookup(id)
    }

    pub fn search(&self, fragment: &str, limit: usize) -> Vec<NameMatch> {
        self.names.search(fragment, limit)
    }

    /// Resolve a point given either a numeric id or an exact name.
    pub fn resolve(&self, reference: &str) -> Result<PointId> {
        match reference.trim().parse::<PointId>() {
            Ok(id) => Ok(self.lookup(id)?.id),
            Err(_) => self.names.resolve(reference.trim()),
        }
    }

    pub fn index(&self) -> &Arc<GridIndex> {
        self.planner.index()
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn names(&self) -> &NameIndex {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.index().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index().is_empty()
    }
}
