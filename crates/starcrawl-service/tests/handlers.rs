mod common;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

use common::{app, get_json, stop_ids};
use starcrawl_service::problem::{
    PROBLEM_INVALID_REQUEST, PROBLEM_ROUTE_NOT_FOUND, PROBLEM_UNKNOWN_POINT,
};

#[tokio::test]
async fn route_by_ids_matches_library_plan() {
    let (status, _, body) = get_json(app(), "/route?from=1&to=4&max_jump=5&max_hops=5").await;

    assert_eq!(status, 200);
    assert_eq!(stop_ids(&body), vec![1, 6, 4]);
    assert_eq!(body["Origin"]["RequestedStop"], true);
    assert_eq!(body["Destination"]["Point"]["Name"], "Fourth Site");
    assert_eq!(body["Stops"][1]["RequestedStop"], false);
}

#[tokio::test]
async fn route_by_names_visits_waypoints() {
    let (status, _, body) = get_json(
        app(),
        "/route?from=Sol&to=Alpha%20Centauri&visit=Barnard%27s%20Star",
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(stop_ids(&body), vec![7, 8, 9]);
    assert!(body["Stops"]
        .as_array()
        .unwrap()
        .iter()
        .all(|stop| stop["RequestedStop"] == true));
}

#[tokio::test]
async fn waypoints_only_route_is_planned() {
    let (status, _, body) = get_json(app(), "/route?visit=9,7,8").await;

    assert_eq!(status, 200);
    let ids = stop_ids(&body);
    assert_eq!(ids.len(), 3);
    for id in [7, 8, 9] {
        assert!(ids.contains(&id));
    }
}

#[tokio::test]
async fn unreachable_route_is_not_found() {
    let (status, request_id, body) = get_json(app(), "/route?from=7&to=10").await;

    assert_eq!(status, 404);
    assert_eq!(body["type"], PROBLEM_ROUTE_NOT_FOUND);
    assert_eq!(body["instance"].as_str(), request_id.as_deref());
}

#[tokio::test]
async fn empty_route_query_is_not_found() {
    let (status, _, body) = get_json(app(), "/route").await;

    assert_eq!(status, 404);
    assert_eq!(body["type"], PROBLEM_ROUTE_NOT_FOUND);
}

#[tokio::test]
async fn unknown_name_suggests_alternatives() {
    let (status, _, body) = get_json(app(), "/route?from=Soll&to=8").await;

    assert_eq!(status, 404);
    assert_eq!(body["type"], PROBLEM_UNKNOWN_POINT);
    assert!(body["detail"].as_str().unwrap().contains("Did you mean"));
}

#[tokio::test]
async fn malformed_limits_are_rejected() {
    let (status, _, body) = get_json(app(), "/route?from=1&to=4&max_hops=lots").await;

    assert_eq!(status, 400);
    assert_eq!(body["type"], PROBLEM_INVALID_REQUEST);
}

#[tokio::test]
async fn too_many_waypoints_is_a_bad_request() {
    let (status, _, body) =
        get_json(app(), "/route?from=1&to=2&visit=3,4,5,6,7,8,9,10,1").await;

    assert_eq!(status, 400);
    assert_eq!(body["type"], PROBLEM_INVALID_REQUEST);
}

#[tokio::test]
async fn search_returns_id_name_pairs() {
    let (status, _, body) = get_json(app(), "/search?q=SITE&limit=2").await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        serde_json::json!([
            {"id": 1, "name": "First Site"},
            {"id": 2, "name": "Second Site"}
        ])
    );
}

#[tokio::test]
async fn search_requires_a_fragment() {
    let (status, _, _) = get_json(app(), "/search?q=").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn point_lookup() {
    let (status, _, body) = get_json(app(), "/points/7").await;
    assert_eq!(status, 200);
    assert_eq!(body["Name"], "Sol");
    assert_eq!(body["X"], 100.0);
    assert_eq!(body["ContainsScoopableStar"], true);

    let (status, _, body) = get_json(app(), "/points/999").await;
    assert_eq!(status, 404);
    assert_eq!(body["type"], PROBLEM_UNKNOWN_POINT);

    let (status, _, _) = get_json(app(), "/points/sol").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn health_probes_report_dataset() {
    let (status, _, body) = get_json(app(), "/health/live").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");

    let (status, _, body) = get_json(app(), "/health/ready").await;
    assert_eq!(status, 200);
    assert_eq!(body["points_loaded"], 10);
    assert_eq!(body["probe"], "faces");
}

#[tokio::test]
async fn caller_request_id_is_echoed() {
    let response = app()
        .oneshot(
            Request::get("/route?from=Nowhere")
                .header("X-Request-ID", "trace-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "trace-42");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["instance"], "trace-42");
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let response = app()
        .oneshot(
            Request::get("/health/live")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
