use axum::{middleware, routing::get, Router};
use std::sync::Arc;

use crate::handler::settings_handler::{get_settings_handler, update_settings_handler};
use crate::middlewares::auth_middleware::{require_actor, AuthState};
use crate::service::settings_service::SettingsService;

pub fn settings_router(service: Arc<SettingsService>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/settings", get(get_settings_handler).put(update_settings_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_actor))
        .with_state(service)
}
