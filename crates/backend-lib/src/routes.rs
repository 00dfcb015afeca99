// ============================
// crates/backend-lib/src/routes.rs
// ============================
//! HTTP surface for the login gate.
use crate::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use gate_common::{LoginRequest, Outcome};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Message shown to clients when a collaborator failed
pub const GENERIC_FAILURE_MSG: &str = "Authentication failed, please try again later";

/// Create the router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/login", post(login_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handler for login submissions
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    let outcome = state.gate.attempt(&request.email, &request.password).await;
    outcome_response(outcome)
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Map an outcome onto a status code and JSON body.
///
/// Locked responses carry `Retry-After`; upstream failures never expose the
/// underlying error text.
pub fn outcome_response(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Success => (StatusCode::OK, Json(Outcome::Success)).into_response(),
        Outcome::Locked { seconds_remaining } => (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, seconds_remaining.to_string())],
            Json(Outcome::Locked { seconds_remaining }),
        )
            .into_response(),
        Outcome::FieldError(errors) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(Outcome::FieldError(errors))).into_response()
        },
        Outcome::UpstreamError { .. } => (
            StatusCode::BAD_GATEWAY,
            Json(Outcome::UpstreamError {
                message: GENERIC_FAILURE_MSG.to_string(),
            }),
        )
            .into_response(),
    }
}
