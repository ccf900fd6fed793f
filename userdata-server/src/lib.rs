//! Axum host for the UserData suppression plugins.
//!
//! The crate wires the classifier from `userdata-core` into a tower layer in
//! front of the host's item endpoints, and exposes the plugin admin API.

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod middleware;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::create_app;
