use serde::Serialize;

/// Numeric identifier for a point. `0` is reserved for "unspecified".
pub type PointId = i64;

/// Identifier reserved as the "unspecified" sentinel at the planning boundary.
pub const UNSPECIFIED: PointId = 0;

/// Cartesian coordinates for a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Calculate the Euclidean distance to another coordinate.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub(crate) fn axes(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// A positioned entity that routes travel between.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub id: PointId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    /// A fuel-scoopable star is present.
    #[serde(rename = "ContainsScoopableStar")]
    pub scoopable: bool,
    /// A refuelling station is present.
    #[serde(rename = "ContainsRefuelStation")]
    pub refuel: bool,
}

impl Point {
    /// Create a point without attribute flags.
    pub fn new(id: PointId, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id,
            name: name.into(),
            coordinate,
            scoopable: false,
            refuel: false,
        }
    }

    pub fn with_flags(mut self, scoopable: bool, refuel: bool) -> Self {
        self.scoopable = scoopable;
        self.refuel = refuel;
        self
    }

    /// Straight-line distance between two points.
    pub fn distance_to(&self, other: &Point) -> f64 {
        self.coordinate.distance_to(&other.coordinate)
    }
}
