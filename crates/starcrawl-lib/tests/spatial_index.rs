//! Integration tests for the grid-bucket spatial index.

mod common;

use std::collections::BTreeMap;

use starcrawl_lib::{
    BucketCoord, Coordinate, Error, GridConfig, GridIndex, Point, PointId, PointStore,
    ProbeStrategy, DEFAULT_MAX,
};

use common::{fixture_store, sample_index};

fn membership(index: &GridIndex) -> BTreeMap<PointId, BucketCoord> {
    index
        .points()
        .map(|p| (p.id, index.bucket_of(p.id).expect("indexed point has a bucket")))
        .collect()
}

#[test]
fn rebuilding_yields_identical_buckets() {
    let store = fixture_store();
    let first = GridIndex::build(GridConfig::default(), &store).expect("first build");
    let second = GridIndex::build(GridConfig::default(), &store).expect("second build");

    assert_eq!(first.len(), store.len());
    assert_eq!(membership(&first), membership(&second));

    for (id, coord) in membership(&first) {
        let ids = |index: &GridIndex| -> Vec<PointId> {
            index
                .bucket(coord)
                .expect("bucket in range")
                .points()
                .iter()
                .map(|p| p.id)
                .collect()
        };
        assert!(ids(&first).contains(&id));
        assert_eq!(ids(&first), ids(&second));
    }
}

#[test]
fn every_point_lives_in_exactly_one_bucket() {
    let index = sample_index();
    let total: usize = membership(&index)
        .values()
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .map(|coord| index.bucket(*coord).map_or(0, |b| b.len()))
        .sum();
    assert_eq!(total, index.len());
}

#[test]
fn out_of_bounds_point_is_rejected_and_absent() {
    let mut index = sample_index();
    let stray = Point::new(99, "Stray", Coordinate::new(DEFAULT_MAX + 10.0, 0.0, 0.0));

    let err = index.insert(stray).expect_err("outside the universe");
    assert!(matches!(err, Error::OutOfBounds { id: 99, .. }));
    assert!(index.get(99).is_none());
    assert!(matches!(index.lookup(99), Err(Error::PointNotFound { id: 99 })));
    assert!(index
        .neighbors_within(&Coordinate::new(DEFAULT_MAX, 0.0, 0.0), 50.0)
        .iter()
        .all(|p| p.id != 99));
}

#[test]
fn out_of_bounds_record_aborts_build() {
    let mut points = common::sample_points();
    points.push(Point::new(50, "Beyond", Coordinate::new(0.0, -20000.0, 0.0)));
    let store = PointStore::from_points(points).expect("ids are valid");

    let err = GridIndex::build(GridConfig::default(), &store).expect_err("build fails");
    assert!(matches!(err, Error::OutOfBounds { id: 50, .. }));
}

#[test]
fn neighbour_query_matches_brute_force_with_cube_probe() {
    let store = fixture_store();
    let index = GridIndex::build(GridConfig::default().with_probe(ProbeStrategy::Cube), &store)
        .expect("cube-probing grid builds");

    for origin in store.iter() {
        for radius in [3.0, 6.0, 12.0] {
            let mut expected: Vec<PointId> = store
                .iter()
                .filter(|p| p.distance_to(origin) < radius)
                .map(|p| p.id)
                .collect();
            let mut found: Vec<PointId> = index
                .neighbors_within(&origin.coordinate, radius)
                .iter()
                .map(|p| p.id)
                .collect();
            expected.sort_unstable();
            found.sort_unstable();
            assert_eq!(found, expected, "origin {} radius {radius}", origin.id);
        }
    }
}
