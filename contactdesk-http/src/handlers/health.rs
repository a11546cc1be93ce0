use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;

/// Health check endpoint. State is only built once the store is connected,
/// so a serving process always reports `ok`; `store_state` carries the
/// supervisor's terminal state and attempt count.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is up and its store is connected", body = serde_json::Value)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "store": state.store.describe(),
        "store_state": state.supervisor.state(),
        "relays": {
            "sheet": state.relays.sheet_enabled(),
            "messenger": state.relays.messenger_enabled(),
        },
        "build_profile": if cfg!(debug_assertions) { "debug" } else { "release" },
    }))
}
