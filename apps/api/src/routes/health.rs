use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version, whether live summaries are enabled and,
/// if so, the model serving them.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "interview-api",
        "liveGeneration": state.gateway.live_generation_enabled(),
        "model": state
            .config
            .live_generation_enabled()
            .then_some(state.config.genai_model.as_str())
    }))
}
