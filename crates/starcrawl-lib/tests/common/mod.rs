#![allow(dead_code)]

use std::path::PathBuf;

use starcrawl_lib::{Coordinate, GridConfig, GridIndex, Point, PointStore};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// The six-point cluster used by the routing scenarios.
pub fn sample_points() -> Vec<Point> {
    vec![
        Point::new(1, "First Site", Coordinate::new(5.0, 3.0, 5.0)),
        Point::new(2, "Second Site", Coordinate::new(0.0, -1.0, 2.0)),
        Point::new(3, "Third Site", Coordinate::new(5.0, 2.0, 5.0)),
        Point::new(4, "Fourth Site", Coordinate::new(0.0, 0.0, 0.0)),
        Point::new(5, "Fifth Site", Coordinate::new(6.0, 5.0, 5.0)),
        Point::new(6, "Sixth Site", Coordinate::new(2.5, 2.5, 2.5)),
    ]
}

pub fn sample_store() -> PointStore {
    PointStore::from_points(sample_points()).expect("sample points are valid")
}

pub fn sample_index() -> GridIndex {
    GridIndex::build(GridConfig::default(), &sample_store()).expect("sample index builds")
}

pub fn fixture_store() -> PointStore {
    PointStore::load(&fixtures_dir().join("sample_points.csv")).expect("fixture loads")
}
