use axum::{extract::State, response::IntoResponse, Extension, Json};
use std::sync::Arc;

use crate::dto::settings_dto::UpdateSettingsRequest;
use crate::dto::ApiResponse;
use crate::handler::extract::ApiJson;
use crate::model::user::Actor;
use crate::service::settings_service::SettingsService;
use crate::util::error::HandlerError;

pub async fn get_settings_handler(State(service): State<Arc<SettingsService>>) -> impl IntoResponse {
    Json(ApiResponse::ok(service.current().await))
}

pub async fn update_settings_handler(
    State(service): State<Arc<SettingsService>>,
    Extension(actor): Extension<Actor>,
    ApiJson(payload): ApiJson<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let saved = service.update(&actor, payload.into()).await?;
    Ok(Json(ApiResponse::ok(saved)))
}
