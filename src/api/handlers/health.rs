use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

/// Liveness probe. Model artifacts are loaded before the listener binds,
/// so a serving process is always ready; the body reports which variant
/// is active.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "ensemble": state.lexical.is_some(),
    }))
}
