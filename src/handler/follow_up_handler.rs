use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};

use crate::dto::follow_up_dto::FollowUpRequest;
use crate::dto::{parse_object_id, ApiResponse};
use crate::handler::extract::ApiJson;
use crate::handler::inquiry_handler::InquiryState;
use crate::model::user::Actor;
use crate::util::error::HandlerError;

pub async fn add_follow_up_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<FollowUpRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id("id", &id)?;
    let updated = service.add_follow_up(&actor, id, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(updated))))
}

pub async fn update_follow_up_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    Path((id, follow_up_id)): Path<(String, String)>,
    ApiJson(payload): ApiJson<FollowUpRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id("id", &id)?;
    let follow_up_id = parse_object_id("followUpId", &follow_up_id)?;
    let updated = service.update_follow_up(&actor, id, follow_up_id, payload).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn delete_follow_up_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    Path((id, follow_up_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id("id", &id)?;
    let follow_up_id = parse_object_id("followUpId", &follow_up_id)?;
    let updated = service.delete_follow_up(&actor, id, follow_up_id).await?;
    Ok(Json(ApiResponse::ok(updated)))
}
