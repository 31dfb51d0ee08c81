//! starcrawl library entry points.
//!
//! This crate loads 3D point datasets, partitions them into a grid-bucket
//! spatial index, searches for hop-limited paths between points, and plans
//! multi-waypoint itineraries by solving every waypoint ordering in
//! parallel. The CLI and HTTP service should only depend on the items
//! exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod atlas;
pub mod dataset;
pub mod error;
pub mod frontier;
pub mod itinerary;
pub mod names;
pub mod point;
pub mod route;
pub mod search;
pub mod spatial;

pub use atlas::Atlas;
pub use dataset::{PointRecord, PointStore, SAMPLE_CENTROID, SAMPLE_RADIUS};
pub use error::{Error, Result};
pub use frontier::{Frontier, SearchStop};
pub use itinerary::{variants, Planner, PlannerConfig, DEFAULT_MAX_WAYPOINTS};
pub use names::{NameIndex, NameMatch, DEFAULT_SEARCH_LIMIT};
pub use point::{Coordinate, Point, PointId, UNSPECIFIED};
pub use route::{Route, Stop};
pub use search::{find_path, RoutingConstraints, DEFAULT_MAX_HOPS, DEFAULT_MAX_JUMP};
pub use spatial::{
    Bucket, BucketCoord, GridConfig, GridIndex, ProbeStrategy, Universe, DEFAULT_MAX,
    DEFAULT_MIN, DEFAULT_RADIUS,
};
