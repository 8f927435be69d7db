//! Ingestion and query handlers.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use tracing::{error, warn};

use shipmap_metrics::{Outcome, RecordError};

use crate::ApiState;

pub const SERIALIZE_ERROR_BODY: &str = "500 - failed to convert topology data into JSON";

async fn record(state: &ApiState, raw_id: &str, outcome: Outcome) -> StatusCode {
    let id = raw_id.trim();
    let result = match outcome {
        Outcome::Success => state.map.record_success(id).await,
        Outcome::Failure => state.map.record_failure(id).await,
    };

    match result {
        Ok(()) => StatusCode::OK,
        Err(RecordError::UnknownConnection(id)) => {
            warn!(connection = %id, "did not find connection");
            StatusCode::NOT_ACCEPTABLE
        }
    }
}

/// An identifier that does not decode to UTF-8 can never name a
/// connection, so it is a miss like any other.
fn decoded_id(path: Result<Path<String>, PathRejection>) -> Option<String> {
    match path {
        Ok(Path(id)) => Some(id),
        Err(rejection) => {
            warn!(error = %rejection, "did not find connection");
            None
        }
    }
}

/// GET|POST /log/complete/{id}
pub async fn log_completed(
    State(state): State<ApiState>,
    path: Result<Path<String>, PathRejection>,
) -> impl IntoResponse {
    match decoded_id(path) {
        Some(id) => record(&state, &id, Outcome::Success).await,
        None => StatusCode::NOT_ACCEPTABLE,
    }
}

/// GET|POST /log/failed/{id}
pub async fn log_failed(
    State(state): State<ApiState>,
    path: Result<Path<String>, PathRejection>,
) -> impl IntoResponse {
    match decoded_id(path) {
        Some(id) => record(&state, &id, Outcome::Failure).await,
        None => StatusCode::NOT_ACCEPTABLE,
    }
}

/// Bare ingestion prefix with no identifier.
pub async fn missing_connection() -> impl IntoResponse {
    warn!(connection = "", "did not find connection");
    StatusCode::NOT_ACCEPTABLE
}

/// GET /get
pub async fn get_topology(State(state): State<ApiState>) -> impl IntoResponse {
    let view = state.map.view().await;
    match serde_json::to_vec(&view) {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
                (header::CONTENT_TYPE, "application/json"),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "topology serialization failed");
            (StatusCode::INTERNAL_SERVER_ERROR, SERIALIZE_ERROR_BODY).into_response()
        }
    }
}
