use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use tracing::info;

use crate::dto::inquiry_dto::{AssignRequest, CheckPhoneQuery, CreateInquiryRequest, ListInquiriesQuery, UpdateInquiryRequest};
use crate::dto::{parse_object_id, ApiResponse};
use crate::handler::extract::{ApiJson, ApiQuery};
use crate::model::user::Actor;
use crate::service::inquiry_service::InquiryService;
use crate::util::error::HandlerError;

pub type InquiryState = Arc<dyn InquiryService>;

pub async fn create_inquiry_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    ApiJson(payload): ApiJson<CreateInquiryRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    info!("[create_inquiry_handler] called by {}", actor.id);
    let created = service.create_inquiry(&actor, payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

pub async fn list_inquiries_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    ApiQuery(query): ApiQuery<ListInquiriesQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let page = service.list_inquiries(&actor, query).await?;
    Ok(Json(ApiResponse::ok(page)))
}

pub async fn get_inquiry_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id("id", &id)?;
    let inquiry = service.get_inquiry(&actor, id).await?;
    Ok(Json(ApiResponse::ok(inquiry)))
}

pub async fn update_inquiry_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateInquiryRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id("id", &id)?;
    let updated = service.update_inquiry(&actor, id, payload).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn delete_inquiry_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id("id", &id)?;
    service.delete_inquiry(&actor, id).await?;
    Ok(Json(ApiResponse::ok(serde_json::json!({ "deleted": id.to_hex() }))))
}

pub async fn assign_inquiry_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<AssignRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id("id", &id)?;
    let target = parse_object_id("userId", &payload.user_id)?;
    let updated = service.assign(&actor, id, target).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn claim_inquiry_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id("id", &id)?;
    let updated = service.claim(&actor, id).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn forward_to_sales_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id("id", &id)?;
    let updated = service.forward_to_sales(&actor, id).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn reassign_to_presales_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<AssignRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id("id", &id)?;
    let target = parse_object_id("userId", &payload.user_id)?;
    let updated = service.reassign_to_presales(&actor, id, target).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn reassign_to_sales_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<AssignRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id("id", &id)?;
    let target = parse_object_id("userId", &payload.user_id)?;
    let updated = service.reassign_to_sales(&actor, id, target).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn move_to_unattended_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_object_id("id", &id)?;
    let updated = service.move_to_unattended(&actor, id).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

pub async fn check_phone_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
    ApiQuery(query): ApiQuery<CheckPhoneQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    // an unencoded '+' in a query string decodes to a space
    let phone = match query.phone.strip_prefix(' ') {
        Some(rest) => format!("+{}", rest),
        None => query.phone,
    };
    let result = service.check_phone_exists(&actor, &phone).await?;
    Ok(Json(ApiResponse::ok(result)))
}

pub async fn list_admitted_handler(
    State(service): State<InquiryState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HandlerError> {
    let students = service.list_admitted_students(&actor).await?;
    Ok(Json(ApiResponse::ok(students)))
}
