use axum::{
    Router,
    routing::get,
};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{items, plugins, system},
    infra::app_state::AppState,
    middleware::DisableUserDataLayer,
};

/// Item listings, wrapped in the Disable UserData layer.
pub fn create_item_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/Items", get(items::get_items_handler))
        .route("/Items/Latest", get(items::get_latest_items_handler))
        .route("/UserItems/Resume", get(items::get_resume_items_handler))
        .route("/Shows/NextUp", get(items::get_next_up_handler))
        .route("/Users/{userId}/Items", get(items::get_user_items_handler))
        .route(
            "/Users/{userId}/Items/Resume",
            get(items::get_user_resume_items_handler),
        )
        .route(
            "/Users/{userId}/Items/Latest",
            get(items::get_user_latest_items_handler),
        )
        .layer(DisableUserDataLayer::from_state(state))
}

pub fn create_plugin_routes() -> Router<AppState> {
    Router::new()
        .route("/Plugins", get(plugins::list_plugins_handler))
        .route(
            "/Plugins/{pluginId}/Configuration",
            get(plugins::get_plugin_configuration_handler)
                .post(plugins::update_plugin_configuration_handler),
        )
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(create_item_routes(&state))
        .merge(create_plugin_routes())
        .route("/health", get(system::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
