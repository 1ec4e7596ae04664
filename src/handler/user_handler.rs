use axum::{
    extract::State,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

use crate::dto::user_dto::AssignableUsersQuery;
use crate::dto::ApiResponse;
use crate::handler::extract::ApiQuery;
use crate::model::user::Actor;
use crate::service::user_service::UserService;
use crate::util::error::HandlerError;

/// Active users of a role, for assignment pickers.
pub async fn list_assignable_users_handler(
    State(service): State<Arc<dyn UserService>>,
    Extension(actor): Extension<Actor>,
    ApiQuery(query): ApiQuery<AssignableUsersQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    let users = service.list_assignable(&actor, query.role).await?;
    Ok(Json(ApiResponse::ok(users)))
}
