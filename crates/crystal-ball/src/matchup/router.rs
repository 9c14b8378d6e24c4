use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::service::{MatchupRequest, MatchupService, MatchupServiceError, MatchupView};

/// Router builder exposing the matchup and roster endpoints.
pub fn matchup_router(service: Arc<MatchupService>) -> Router {
    Router::new()
        .route("/compare", post(legacy_compare_handler))
        .route("/api/v1/matchups", post(compare_handler))
        .route("/api/v1/roster", get(roster_handler))
        .with_state(service)
}

#[derive(Debug, Serialize)]
pub(crate) struct RosterView {
    pub(crate) athletes: Vec<String>,
    pub(crate) activities: Vec<String>,
}

/// The browser client reads the margin as `difference`.
#[derive(Debug, Serialize)]
struct LegacyMatchupView {
    #[serde(flatten)]
    view: MatchupView,
    difference: f64,
}

pub(crate) async fn compare_handler(
    State(service): State<Arc<MatchupService>>,
    payload: Result<Json<MatchupRequest>, JsonRejection>,
) -> Response {
    match decide(&service, payload).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn legacy_compare_handler(
    State(service): State<Arc<MatchupService>>,
    payload: Result<Json<MatchupRequest>, JsonRejection>,
) -> Response {
    match decide(&service, payload).await {
        Ok(view) => {
            let difference = view.margin;
            (StatusCode::OK, Json(LegacyMatchupView { view, difference })).into_response()
        }
        Err(response) => response,
    }
}

async fn decide(
    service: &MatchupService,
    payload: Result<Json<MatchupRequest>, JsonRejection>,
) -> Result<MatchupView, Response> {
    let Json(request) =
        payload.map_err(|rejection| bad_request(json!({ "error": rejection.body_text() })))?;

    match service.run(request).await {
        Ok(outcome) => Ok(outcome.view()),
        Err(err @ MatchupServiceError::MissingSelection(_)) => Err(bad_request(json!({
            "error": "Missing selection",
            "detail": err.to_string(),
        }))),
        Err(MatchupServiceError::Comparison(err)) => {
            Err(bad_request(json!({ "error": err.to_string() })))
        }
    }
}

fn bad_request(payload: serde_json::Value) -> Response {
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

pub(crate) async fn roster_handler(State(service): State<Arc<MatchupService>>) -> Json<RosterView> {
    let roster = service.engine().roster();
    Json(RosterView {
        athletes: roster.competitor_names(),
        activities: roster.activity_names(),
    })
}
