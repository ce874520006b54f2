use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

/// Full transcript of the session, oldest turn first.
pub async fn get_history(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let turns = state.log.all();

    Ok(Json(json!({
        "count": turns.len(),
        "turns": turns,
    })))
}
