use crate::api::AppState;
use crate::error::Result;
use crate::services::diagnostics_service::{Probe, ProbeReport};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

const ENDPOINTS: [Probe; 4] = [Probe::Health, Probe::Config, Probe::ReadProbe, Probe::WriteProbe];

async fn dispatch(state: &AppState, probe: Probe) -> Result<Json<ProbeReport>> {
    let report = state.diagnostics_service.run(probe).await?;
    Ok(Json(report))
}

/// Liveness check.
pub async fn health(State(state): State<AppState>) -> Result<Json<ProbeReport>> {
    dispatch(&state, Probe::Health).await
}

/// Reports which settings are present, with secrets masked.
pub async fn aws_config(State(state): State<AppState>) -> Result<Json<ProbeReport>> {
    dispatch(&state, Probe::Config).await
}

/// Describes the submissions table and resolves the caller identity.
pub async fn test_dynamodb(State(state): State<AppState>) -> Result<Json<ProbeReport>> {
    dispatch(&state, Probe::ReadProbe).await
}

/// Writes a throwaway record with `status = test`.
pub async fn test_write(State(state): State<AppState>) -> Result<Json<ProbeReport>> {
    dispatch(&state, Probe::WriteProbe).await
}

pub async fn not_found() -> impl IntoResponse {
    let mut available: Vec<&str> = ENDPOINTS.iter().map(|p| p.path()).collect();
    available.push("/contact");

    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found", "availableEndpoints": available })))
}
