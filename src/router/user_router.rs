use axum::{middleware, routing::get, Router};
use std::sync::Arc;

use crate::handler::user_handler::list_assignable_users_handler;
use crate::middlewares::auth_middleware::{require_actor, AuthState};
use crate::service::user_service::UserService;

pub fn user_router(service: Arc<dyn UserService>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/users/assignable", get(list_assignable_users_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_actor))
        .with_state(service)
}
