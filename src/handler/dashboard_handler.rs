use axum::{extract::State, response::IntoResponse, Extension, Json};
use std::sync::Arc;

use crate::dto::ApiResponse;
use crate::model::user::Actor;
use crate::service::dashboard_service::DashboardService;
use crate::util::error::HandlerError;

pub async fn dashboard_stats_handler(
    State(service): State<Arc<dyn DashboardService>>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HandlerError> {
    let stats = service.get_dashboard_stats(&actor).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

pub async fn unattended_counts_handler(
    State(service): State<Arc<dyn DashboardService>>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HandlerError> {
    let counts = service.get_unattended_counts(&actor).await?;
    Ok(Json(ApiResponse::ok(counts)))
}
