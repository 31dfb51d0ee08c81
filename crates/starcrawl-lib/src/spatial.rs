//! Uniform grid partitioning of the universe cube.
//!
//! The universe is a fixed cube `[min, max]` on every axis, split into
//! `count = ceil((max - min) / radius)` cells per axis. Each point lands in
//! exactly one bucket, chosen by `floor((coord - min) / cell_size)` on each
//! axis. Radius queries scan a small set of probed buckets and filter by the
//! true Euclidean distance.
//!
//! The index is populated once and then only read. Share it behind an `Arc`
//! once construction finishes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info};

use crate::dataset::PointStore;
use crate::error::{Error, Result};
use crate::point::{Coordinate, Point, PointId, UNSPECIFIED};

/// Lower bound of the supported universe on every axis.
pub const DEFAULT_MIN: f64 = -16899.750;
/// Upper bound of the supported universe on every axis.
pub const DEFAULT_MAX: f64 = 65630.156;
/// Default granularity radius used when building the grid.
pub const DEFAULT_RADIUS: f64 = 1000.0;

/// Upper bound on the total number of buckets a grid may allocate.
const MAX_BUCKETS: usize = 1 << 24;

/// Bounding cube shared by all three axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Universe {
    pub min: f64,
    pub max: f64,
}

impl Default for Universe {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
        }
    }
}

impl Universe {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether every axis of `coordinate` lies within `[min, max]`.
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        coordinate
            .axes()
            .iter()
            .all(|value| *value >= self.min && *value <= self.max)
    }

    fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// How radius queries choose which buckets to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeStrategy {
    /// The origin bucket plus the buckets reached by offsetting the origin by
    /// `±radius` along each axis independently. Cheap, but can miss
    /// neighbours sitting in diagonal buckets.
    #[default]
    Faces,
    /// Every bucket in the cube of cells that the query sphere can touch.
    Cube,
}

impl ProbeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStrategy::Faces => "faces",
            ProbeStrategy::Cube => "cube",
        }
    }
}

impl fmt::Display for ProbeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProbeStrategy {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "faces" | "face" => Ok(ProbeStrategy::Faces),
            "cube" => Ok(ProbeStrategy::Cube),
            other => Err(Error::InvalidGrid {
                message: format!("unknown probe strategy '{other}'; expected faces or cube"),
            }),
        }
    }
}

/// Parameters that shape a [`GridIndex`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    pub universe: Universe,
    /// Granularity radius; roughly the edge length of one bucket.
    pub radius: f64,
    pub probe: ProbeStrategy,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            universe: Universe::default(),
            radius: DEFAULT_RADIUS,
            probe: ProbeStrategy::default(),
        }
    }
}

impl GridConfig {
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_probe(mut self, probe: ProbeStrategy) -> Self {
        self.probe = probe;
        self
    }
}

/// Integer grid coordinates of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketCoord {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

/// One cell of the grid.
#[derive(Debug, Clone, Default)]
pub struct Bucket {
    points: Vec<Arc<Point>>,
}

impl Bucket {
    pub fn points(&self) -> &[Arc<Point>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Grid-bucket spatial index over a fixed universe cube.
#[derive(Debug, Clone)]
pub struct GridIndex {
    config: GridConfig,
    cells_per_axis: usize,
    cell_size: f64,
    buckets: Vec<Bucket>,
    points: HashMap<PointId, Arc<Point>>,
    placement: HashMap<PointId, BucketCoord>,
}

impl GridIndex {
    /// Allocate an empty grid covering the configured universe.
    pub fn new(config: GridConfig) -> Result<Self> {
        let span = config.universe.span();
        if !config.universe.min.is_finite() || !config.universe.max.is_finite() || span <= 0.0 {
            return Err(Error::InvalidGrid {
                message: format!(
                    "universe bounds [{}, {}] do not form a cube",
                    config.universe.min, config.universe.max
                ),
            });
        }
        if !config.radius.is_finite() || config.radius <= 0.0 {
            return Err(Error::InvalidGrid {
                message: format!("radius must be positive, got {}", config.radius),
            });
        }

        let cells_per_axis = ((span / config.radius).ceil() as usize).max(1);
        let total = cells_per_axis
            .checked_mul(cells_per_axis)
            .and_then(|square| square.checked_mul(cells_per_axis))
            .filter(|total| *total <= MAX_BUCKETS)
            .ok_or_else(|| Error::InvalidGrid {
                message: format!(
                    "radius {} needs {cells_per_axis}^3 buckets, above the limit of {MAX_BUCKETS}",
                    config.radius
                ),
            })?;
        let cell_size = (span / cells_per_axis as f64).ceil();

        debug!(cells_per_axis, cell_size, "allocating spatial grid");

        Ok(Self {
            config,
            cells_per_axis,
            cell_size,
            buckets: vec![Bucket::default(); total],
            points: HashMap::new(),
            placement: HashMap::new(),
        })
    }

    /// Build and populate an index from every point in `store`.
    ///
    /// Any point that cannot be placed aborts the build.
    pub fn build(config: GridConfig, store: &PointStore) -> Result<Self> {
        let mut index = Self::new(config)?;
        for point in store.iter() {
            index.insert(point.clone())?;
        }
        info!(
            points = index.len(),
            cells_per_axis = index.cells_per_axis,
            probe = %index.config.probe,
            "spatial index populated"
        );
        Ok(index)
    }

    /// Place a point into its bucket.
    pub fn insert(&mut self, point: Point) -> Result<()> {
        if point.id == UNSPECIFIED {
            return Err(Error::ReservedPointId { name: point.name });
        }
        if !self.config.universe.contains(&point.coordinate) {
            return Err(Error::OutOfBounds {
                id: point.id,
                name: point.name,
                x: point.coordinate.x,
                y: point.coordinate.y,
                z: point.coordinate.z,
            });
        }
        if self.points.contains_key(&point.id) {
            return Err(Error::DuplicatePoint { id: point.id });
        }

        let coord = self.bucket_for(&point.coordinate);
        let slot = self.slot(coord);
        let point = Arc::new(point);
        self.buckets[slot].points.push(Arc::clone(&point));
        self.placement.insert(point.id, coord);
        self.points.insert(point.id, point);
        Ok(())
    }

    pub fn get(&self, id: PointId) -> Option<&Arc<Point>> {
        self.points.get(&id)
    }

    /// Like [`GridIndex::get`] but reports a missing id as an error.
    pub fn lookup(&self, id: PointId) -> Result<Arc<Point>> {
        self.points
            .get(&id)
            .cloned()
            .ok_or(Error::PointNotFound { id })
    }

    /// Bucket that holds the point with `id`, if it was inserted.
    pub fn bucket_of(&self, id: PointId) -> Option<BucketCoord> {
        self.placement.get(&id).copied()
    }

    pub fn bucket(&self, coord: BucketCoord) -> Option<&Bucket> {
        if coord.i >= self.cells_per_axis
            || coord.j >= self.cells_per_axis
            || coord.k >= self.cells_per_axis
        {
            return None;
        }
        self.buckets.get(self.slot(coord))
    }

    /// Bucket coordinates a position falls into. Positions outside the
    /// universe are clamped onto its boundary.
    pub fn bucket_for(&self, coordinate: &Coordinate) -> BucketCoord {
        let [x, y, z] = coordinate.axes();
        BucketCoord {
            i: self.axis_cell(x),
            j: self.axis_cell(y),
            k: self.axis_cell(z),
        }
    }

    /// All points strictly closer than `radius` to `origin`, the origin
    /// itself included when it is indexed.
    ///
    /// Results follow bucket probe order, then insertion order inside each
    /// bucket.
    pub fn neighbors_within(&self, origin: &Coordinate, radius: f64) -> Vec<Arc<Point>> {
        let mut found = Vec::new();
        for coord in self.probe(origin, radius) {
            let bucket = &self.buckets[self.slot(coord)];
            for candidate in &bucket.points {
                if origin.distance_to(&candidate.coordinate) < radius {
                    found.push(Arc::clone(candidate));
                }
            }
        }
        found
    }

    /// Distinct buckets a radius query around `origin` will scan.
    pub fn probe(&self, origin: &Coordinate, radius: f64) -> Vec<BucketCoord> {
        let home = self.bucket_for(origin);
        match self.config.probe {
            ProbeStrategy::Faces => {
                let universe = &self.config.universe;
                let mut probed = vec![home];
                let offsets = [
                    Coordinate::new(origin.x - radius, origin.y, origin.z),
                    Coordinate::new(origin.x + radius, origin.y, origin.z),
                    Coordinate::new(origin.x, origin.y - radius, origin.z),
                    Coordinate::new(origin.x, origin.y + radius, origin.z),
                    Coordinate::new(origin.x, origin.y, origin.z - radius),
                    Coordinate::new(origin.x, origin.y, origin.z + radius),
                ];
                for offset in offsets {
                    let clamped = Coordinate::new(
                        universe.clamp(offset.x),
                        universe.clamp(offset.y),
                        universe.clamp(offset.z),
                    );
                    let coord = self.bucket_for(&clamped);
                    if !probed.contains(&coord) {
                        probed.push(coord);
                    }
                }
                probed
            }
            ProbeStrategy::Cube => {
                let reach = (radius / self.cell_size).ceil().max(0.0) as usize;
                let last = self.cells_per_axis - 1;
                let range = |center: usize| {
                    center.saturating_sub(reach)..=center.saturating_add(reach).min(last)
                };

                let mut probed = Vec::new();
                for i in range(home.i) {
                    for j in range(home.j) {
                        for k in range(home.k) {
                            probed.push(BucketCoord { i, j, k });
                        }
                    }
                }
                probed
            }
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn cells_per_axis(&self) -> usize {
        self.cells_per_axis
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Iterate over every indexed point in no particular order.
    pub fn points(&self) -> impl Iterator<Item = &Arc<Point>> {
        self.points.values()
    }

    fn axis_cell(&self, value: f64) -> usize {
        let offset = ((value - self.config.universe.min) / self.cell_size).floor();
        if offset <= 0.0 {
            0
        } else {
            (offset as usize).min(self.cells_per_axis - 1)
        }
    }

    fn slot(&self, coord: BucketCoord) -> usize {
        (coord.i * self.cells_per_axis + coord.j) * self.cells_per_axis + coord.k
    }
}
