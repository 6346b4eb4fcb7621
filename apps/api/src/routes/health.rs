use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::llm_client::MODEL;
use crate::state::AppState;

/// GET /health
/// Service version, whether a model credential is configured, and the cache backend.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "careerguide-api",
        "model": MODEL,
        "model_configured": state.advisor.model_configured(),
        "cache": {
            "backend": state.advisor.cache().backend(),
            "namespace": state.config.cache_namespace,
        }
    }))
}
