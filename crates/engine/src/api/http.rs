//! HTTP routes.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use imagind_domain::ActorId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::app::App;
use crate::use_cases::{NarratedEvent, RefereeError};

const DEFAULT_HISTORY_LIMIT: usize = 20;
const MAX_HISTORY_LIMIT: usize = 200;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/health", get(health))
        .route("/api/actors/{id}/commands", post(submit_command))
        .route("/api/actors/{id}/events", get(recent_events))
        .route("/api/tick", post(run_tick))
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
struct CommandRequest {
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CommandResponse {
    /// What the actor reads, in order
    lines: Vec<String>,
    events: usize,
    consequences: usize,
}

async fn submit_command(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Json(request): Json<CommandRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("text cannot be empty".to_string()));
    }
    let actor_id = ActorId::from_uuid(id);

    let result = app
        .use_cases
        .submit
        .execute(actor_id, text)
        .await
        .map_err(|e| match e {
            RefereeError::ActorNotFound(_) => ApiError::NotFound,
            RefereeError::Repo(e) => e.into(),
        })?;

    let mut lines = Vec::new();
    for event in result.events.iter().chain(&result.consequences) {
        lines.extend(
            app.use_cases
                .narrator
                .describe(event, actor_id, false)
                .await?,
        );
    }

    Ok(Json(CommandResponse {
        lines,
        events: result.events.len(),
        consequences: result.consequences.len(),
    }))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

async fn recent_events(
    State(app): State<Arc<App>>,
    Path(id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<NarratedEvent>>, ApiError> {
    let actor_id = ActorId::from_uuid(id);
    app.repositories
        .world
        .get_actor(actor_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);
    let events = app
        .use_cases
        .history
        .execute(actor_id, limit, false)
        .await?;
    Ok(Json(events))
}

#[derive(Debug, Serialize)]
struct TickResponse {
    actors: usize,
    events: usize,
    failures: usize,
}

async fn run_tick(State(app): State<Arc<App>>) -> Result<Json<TickResponse>, ApiError> {
    let summary = app.use_cases.tick.execute().await?;
    Ok(Json(TickResponse {
        actors: summary.actors,
        events: summary.events.len(),
        failures: summary.failures,
    }))
}

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => {
                (axum::http::StatusCode::NOT_FOUND, "Not found").into_response()
            }
            ApiError::BadRequest(msg) => {
                (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error",
                )
                    .into_response()
            }
        }
    }
}

impl From<crate::infrastructure::ports::RepoError> for ApiError {
    fn from(e: crate::infrastructure::ports::RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{TimeZone, Utc};
    use tower::ServiceExt;

    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::event_log::InMemoryEventLog;
    use crate::infrastructure::ports::MockIntentResolverPort;
    use crate::use_cases::test_support::TestWorld;

    fn router(t: &TestWorld, resolver: MockIntentResolverPort) -> Router {
        let app = App::new(
            t.world.clone(),
            Arc::new(InMemoryEventLog::new()),
            Arc::new(resolver),
            Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            )),
            10,
        );
        routes().with_state(Arc::new(app))
    }

    fn quiet_game_master() -> MockIntentResolverPort {
        let mut resolver = MockIntentResolverPort::new();
        resolver.expect_resolve().returning(|_| Ok(Vec::new()));
        resolver
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn command(actor_id: ActorId, text: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(format!("/api/actors/{}/commands", actor_id))
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "text": text }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let t = TestWorld::new().await;
        let response = router(&t, MockIntentResolverPort::new())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn command_returns_the_actors_lines_and_is_recorded() {
        let t = TestWorld::new().await;
        let app = router(&t, quiet_game_master());

        let response = app
            .clone()
            .oneshot(command(t.mira.id, "look"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: CommandResponse = body_json(response).await;
        assert_eq!(body.events, 1);
        assert!(body.lines.iter().any(|l| l == "A long, echoing hall."));

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/actors/{}/events?limit=5", t.tom.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let history: Vec<serde_json::Value> = body_json(response).await;
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn unknown_actor_is_not_found() {
        let t = TestWorld::new().await;
        let response = router(&t, MockIntentResolverPort::new())
            .oneshot(command(ActorId::new(), "look"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_command_is_rejected() {
        let t = TestWorld::new().await;
        let response = router(&t, MockIntentResolverPort::new())
            .oneshot(command(t.mira.id, "   "))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn tick_with_no_autonomous_actors_does_nothing() {
        let t = TestWorld::new().await;
        let response = router(&t, MockIntentResolverPort::new())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/tick")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let summary: serde_json::Value = body_json(response).await;
        assert_eq!(summary["actors"], 0);
    }
}
