use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::Value;
use tracing::info;
use userdata_core::{DisableUserDataConfig, PluginInfo, PluginKind};

use crate::{
    errors::{AppError, AppResult},
    infra::app_state::AppState,
};

/// `GET /Plugins`
pub async fn list_plugins_handler(
    State(state): State<AppState>,
) -> Json<Vec<PluginInfo>> {
    Json(state.settings.snapshot().describe_all())
}

/// `GET /Plugins/{pluginId}/Configuration`
pub async fn get_plugin_configuration_handler(
    State(state): State<AppState>,
    Path(plugin_id): Path<String>,
) -> AppResult<Json<Value>> {
    let kind: PluginKind = plugin_id.parse()?;
    let settings = state.settings.snapshot();

    let value = match kind {
        PluginKind::DisableUserData => {
            serde_json::to_value(settings.disable_user_data)
        }
        PluginKind::CollectionsAccelerator => {
            serde_json::to_value(settings.collections_accelerator)
        }
    }
    .map_err(|err| AppError::internal(err.to_string()))?;

    Ok(Json(value))
}

/// `POST /Plugins/{pluginId}/Configuration`
///
/// Only Disable UserData accepts changes. The new settings are persisted
/// before they take effect.
pub async fn update_plugin_configuration_handler(
    State(state): State<AppState>,
    Path(plugin_id): Path<String>,
    Json(config): Json<DisableUserDataConfig>,
) -> AppResult<StatusCode> {
    let kind: PluginKind = plugin_id.parse()?;
    if !kind.is_configurable() {
        return Err(AppError::bad_request(format!(
            "{kind} has no configurable settings"
        )));
    }

    state.settings.update_disable_user_data(config)?;
    info!(plugin = %kind, "plugin configuration saved");
    Ok(StatusCode::NO_CONTENT)
}
