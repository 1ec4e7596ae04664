use axum::{middleware, routing::get, Router};
use std::sync::Arc;

use crate::handler::dashboard_handler::{dashboard_stats_handler, unattended_counts_handler};
use crate::middlewares::auth_middleware::{require_actor, AuthState};
use crate::service::dashboard_service::DashboardService;

pub fn dashboard_router(service: Arc<dyn DashboardService>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/dashboard/stats", get(dashboard_stats_handler))
        .route("/dashboard/unattended", get(unattended_counts_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, require_actor))
        .with_state(service)
}
