use super::common::*;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use crate::matchup::{matchup_router, CommentaryError, NoiseMode};

fn router_with<C>(commentary: C) -> axum::Router
where
    C: crate::matchup::CommentaryGenerator + 'static,
{
    let service = service(commentary, NoiseMode::Disabled, Duration::from_secs(2));
    matchup_router(Arc::new(service))
}

async fn post_json(router: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds");

    let response = router.oneshot(request).await.expect("router responds");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let payload = serde_json::from_slice(&bytes).expect("json body");
    (status, payload)
}

#[tokio::test]
async fn compare_returns_scores_and_commentary() {
    let router = router_with(FixedCommentary("A sprint for the ages."));
    let (status, body) = post_json(
        router,
        "/compare",
        json!({ "athlete1": "Speedy", "athlete2": "Slowpoke", "activity": "Sprint" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["activity"], "Sprint");
    assert_eq!(body["athlete1"], "Speedy");
    assert_eq!(body["score1"], 10.0);
    assert_eq!(body["score2"], 2.0);
    assert_eq!(body["margin"], 8.0);
    assert_eq!(body["difference"], 8.0);
    assert_eq!(body["winner"], "Speedy");
    assert_eq!(body["draw"], false);
    assert_eq!(body["commentary"], "A sprint for the ages.");
    assert_eq!(body["commentary_status"], "generated");
    assert!(body.get("commentary_error").is_none());
}

#[tokio::test]
async fn versioned_route_fails_open_on_commentary_errors() {
    let router = router_with(FailingCommentary(CommentaryError::Transport(
        "connection reset".to_string(),
    )));
    let (status, body) = post_json(
        router,
        "/api/v1/matchups",
        json!({ "player1": "Slowpoke", "player2": "Speedy", "event": "Sprint" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["winner"], "Speedy");
    assert!(body.get("difference").is_none());
    assert_eq!(body["commentary"], Value::Null);
    assert_eq!(body["commentary_status"], "unavailable");
    assert!(body["commentary_error"]
        .as_str()
        .expect("error string")
        .contains("connection reset"));
}

#[tokio::test]
async fn missing_selection_is_a_bad_request() {
    let router = router_with(FixedCommentary("unused"));
    let (status, body) = post_json(router, "/compare", json!({ "athlete1": "Speedy" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing selection");
    assert_eq!(body["detail"], "Missing selection: athlete2, activity");
}

#[tokio::test]
async fn mistyped_fields_are_a_json_bad_request() {
    for uri in ["/compare", "/api/v1/matchups"] {
        let router = router_with(FixedCommentary("unused"));
        let (status, body) = post_json(
            router,
            uri,
            json!({ "athlete1": 5, "athlete2": "Slowpoke", "activity": "Sprint" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["error"]
            .as_str()
            .expect("error string")
            .contains("athlete1"));
    }
}

#[tokio::test]
async fn missing_content_type_is_a_json_bad_request() {
    let router = router_with(FixedCommentary("unused"));
    let request = Request::builder()
        .method("POST")
        .uri("/compare")
        .body(Body::from(
            json!({ "athlete1": "Speedy", "athlete2": "Slowpoke", "activity": "Sprint" })
                .to_string(),
        ))
        .expect("request builds");

    let response = router.oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");
    assert!(body["error"].as_str().is_some_and(|error| !error.is_empty()));
}

#[tokio::test]
async fn unknown_names_are_a_bad_request() {
    let router = router_with(FixedCommentary("unused"));
    let (status, body) = post_json(
        router,
        "/compare",
        json!({ "athlete1": "Speedy", "athlete2": "Slowpoke", "activity": "Curling" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "activity not found: Curling" }));
}

#[tokio::test]
async fn roster_lists_names() {
    let router = router_with(FixedCommentary("unused"));
    let request = Request::builder()
        .uri("/api/v1/roster")
        .body(Body::empty())
        .expect("request builds");

    let response = router.oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let body: Value = serde_json::from_slice(&bytes).expect("json body");

    let athletes = body["athletes"].as_array().expect("athlete list");
    assert_eq!(athletes.len(), 5);
    assert!(athletes.contains(&json!("Glass Cannon")));
    assert_eq!(
        body["activities"],
        json!(["Arm Wrestling", "Marathon", "Nap", "Sprint"])
    );
}
