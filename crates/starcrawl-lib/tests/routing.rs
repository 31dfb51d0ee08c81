mod common;

use std::sync::Arc;

use starcrawl_lib::{
    find_path, variants, Atlas, Coordinate, Error, GridConfig, GridIndex, Planner, PlannerConfig,
    Point, PointId, PointStore, RoutingConstraints, UNSPECIFIED,
};

use common::{fixture_store, sample_index};

fn sample_planner(config: PlannerConfig) -> Planner {
    Planner::new(Arc::new(sample_index()), config).expect("planner builds")
}

fn fixture_atlas() -> Atlas {
    Atlas::build(&fixture_store(), GridConfig::default()).expect("atlas builds")
}

#[test]
fn greedy_search_routes_through_the_midpoint() {
    let planner = sample_planner(PlannerConfig::default());
    let route = planner
        .plan_route(1, 4, &[], &RoutingConstraints::new(5.0, 5))
        .expect("route exists");

    assert_eq!(route.ids(), vec![1, 6, 4]);
    let requested: Vec<bool> = route.stops.iter().map(|s| s.requested).collect();
    assert_eq!(requested, vec![true, false, true]);
    assert_eq!(route.origin.id(), 1);
    assert_eq!(route.destination.id(), 4);

    let summed: f64 = route
        .stops
        .windows(2)
        .map(|pair| pair[0].point.distance_to(&pair[1].point))
        .sum();
    assert!((route.distance - summed).abs() < 1e-9);
}

#[test]
fn only_end_set_returns_that_stop() {
    let planner = sample_planner(PlannerConfig::default());
    let route = planner
        .plan_route(UNSPECIFIED, 3, &[], &RoutingConstraints::default())
        .expect("single stop");

    assert_eq!(route.ids(), vec![3]);
    assert!(route.stops[0].requested);
    assert_eq!(route.distance, 0.0);
    assert_eq!(route.checks, 0);
}

#[test]
fn only_start_set_returns_that_stop() {
    let planner = sample_planner(PlannerConfig::default());
    let route = planner
        .plan_route(2, UNSPECIFIED, &[], &RoutingConstraints::default())
        .expect("single stop");
    assert_eq!(route.ids(), vec![2]);
    assert!(route.destination.requested);
}

#[test]
fn same_start_and_end_is_a_zero_length_route() {
    let planner = sample_planner(PlannerConfig::default());
    let route = planner
        .plan_route(5, 5, &[], &RoutingConstraints::default())
        .expect("trivial route");

    assert_eq!(route.ids(), vec![5]);
    assert_eq!(route.distance, 0.0);
    assert_eq!(route.hop_count(), 0);
}

#[test]
fn nothing_requested_is_not_found() {
    let planner = sample_planner(PlannerConfig::default());
    let err = planner
        .plan_route(UNSPECIFIED, UNSPECIFIED, &[], &RoutingConstraints::default())
        .expect_err("nothing to plan");
    assert!(matches!(err, Error::EmptyItinerary));
    assert!(err.is_not_found());
}

#[test]
fn unreachable_goal_is_not_found() {
    let atlas = fixture_atlas();
    let err = atlas
        .plan_route(1, 10, &[], &RoutingConstraints::default())
        .expect_err("outpost is out of reach");
    assert!(matches!(err, Error::RouteNotFound { start: 1, goal: 10 }));
    assert!(format!("{err}").contains("no route found"));
}

#[test]
fn unknown_ids_are_reported_before_searching() {
    let planner = sample_planner(PlannerConfig::default());
    let err = planner
        .plan_route(1, 404, &[], &RoutingConstraints::default())
        .expect_err("unknown goal");
    assert!(matches!(err, Error::PointNotFound { id: 404 }));
}

#[test]
fn waypoint_limits_are_enforced() {
    let planner = sample_planner(PlannerConfig {
        max_waypoints: 2,
        worker_threads: None,
    });
    let err = planner
        .plan_route(1, 4, &[2, 3, 5], &RoutingConstraints::default())
        .expect_err("too many waypoints");
    assert!(matches!(err, Error::InvalidQuery { .. }));
    assert!(!err.is_not_found());

    let err = planner
        .plan_route(1, 4, &[UNSPECIFIED], &RoutingConstraints::default())
        .expect_err("reserved waypoint");
    assert!(matches!(err, Error::InvalidQuery { .. }));
}

#[test]
fn waypoints_are_visited_in_the_shortest_order() {
    let atlas = fixture_atlas();
    let constraints = RoutingConstraints::default();
    let route = atlas
        .plan_route(7, UNSPECIFIED, &[9, 8], &constraints)
        .expect("itinerary exists");

    assert_eq!(route.ids(), vec![7, 8, 9]);
    assert!(route.stops.iter().all(|s| s.requested));
    assert_eq!(route.destination.id(), 9);
}

#[test]
fn chosen_itinerary_is_no_longer_than_any_variant() {
    let atlas = fixture_atlas();
    let constraints = RoutingConstraints::new(12.0, 10);
    let waypoints: [PointId; 2] = [8, 9];
    let best = atlas
        .plan_route(7, UNSPECIFIED, &waypoints, &constraints)
        .expect("itinerary exists");

    let candidates = variants(7, UNSPECIFIED, &waypoints);
    assert_eq!(candidates.len(), 2);
    for ids in candidates {
        let distance: Option<f64> = ids
            .windows(2)
            .map(|pair| {
                find_path(atlas.index(), pair[0], pair[1], &constraints)
                    .ok()
                    .map(|leg| leg.distance)
            })
            .sum();
        if let Some(distance) = distance {
            assert!(best.distance <= distance + 1e-9, "variant {ids:?}");
        }
    }
}

#[test]
fn dedicated_worker_pool_gives_the_same_answer() {
    let shared = sample_planner(PlannerConfig::default());
    let pooled = sample_planner(PlannerConfig {
        worker_threads: Some(2),
        ..PlannerConfig::default()
    });
    let constraints = RoutingConstraints::new(5.0, 10);

    let a = shared
        .plan_route(1, 4, &[5, 3], &constraints)
        .expect("shared pool route");
    let b = pooled
        .plan_route(1, 4, &[5, 3], &constraints)
        .expect("dedicated pool route");
    assert_eq!(a.ids(), b.ids());
    assert_eq!(a.distance, b.distance);
}

#[test]
fn failing_variant_does_not_sink_its_siblings() {
    let store = PointStore::from_points(vec![
        Point::new(1, "West", Coordinate::new(0.0, 0.0, 0.0)),
        Point::new(2, "Middle", Coordinate::new(10.0, 0.0, 0.0)),
        Point::new(3, "East", Coordinate::new(20.0, 0.0, 0.0)),
    ])
    .expect("line points are valid");
    let index = Arc::new(GridIndex::build(GridConfig::default(), &store).expect("index builds"));
    let planner = Planner::new(Arc::clone(&index), PlannerConfig::default()).expect("planner");
    let constraints = RoutingConstraints::new(11.0, 1);

    // Visiting 3 first needs a two-hop leg, so that ordering cannot succeed.
    assert!(matches!(
        find_path(&index, 1, 3, &constraints),
        Err(Error::RouteNotFound { start: 1, goal: 3 })
    ));

    let route = planner
        .plan_route(1, UNSPECIFIED, &[2, 3], &constraints)
        .expect("the in-order variant still succeeds");
    assert_eq!(route.ids(), vec![1, 2, 3]);
    assert!((route.distance - 20.0).abs() < 1e-9);
}

#[test]
fn hop_limit_holds_for_every_leg() {
    let planner = sample_planner(PlannerConfig::default());
    for max_hops in 1..=4 {
        let constraints = RoutingConstraints::new(5.0, max_hops);
        if let Ok(route) = find_path(planner.index(), 2, 5, &constraints) {
            assert!(route.hop_count() <= max_hops);
        }
    }
}

#[test]
fn atlas_resolves_names_and_ids() {
    let atlas = fixture_atlas();
    assert_eq!(atlas.resolve("sol").expect("by name"), 7);
    assert_eq!(atlas.resolve(" 8 ").expect("by id"), 8);
    assert!(matches!(
        atlas.resolve("Sool"),
        Err(Error::UnknownPointName { .. })
    ));
    assert!(matches!(atlas.resolve("77"), Err(Error::PointNotFound { id: 77 })));
}
