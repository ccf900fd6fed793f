use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::infra::app_state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let settings = state.settings.snapshot();
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "catalog_items": state.catalog.len(),
        "disable_user_data": {
            "enabled": settings.disable_user_data.enabled,
            "active": settings.disable_user_data.is_active(),
        },
    }))
}
