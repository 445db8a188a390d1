use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::app::SharedState;

/// GET /status
pub async fn status_handler(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "token_cached": state.clips().tokens().has_valid_token().await,
        "default_broadcaster": state.config().broadcaster_id.is_some(),
    }))
}
