use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

/// Per-category entry counts for the loaded corpus.
pub async fn get_corpus(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(json!({
        "categories": state.corpus.summaries(),
        "total_units": state.corpus.unit_count(),
    })))
}
