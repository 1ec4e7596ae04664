use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::model::user::Actor;
use crate::service::user_service::UserService;
use crate::util::error::{HandlerError, HandlerErrorKind, ServiceError};
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub user_service: Arc<dyn UserService>,
}

fn unauthorized(message: &str) -> HandlerError {
    HandlerError::new(HandlerErrorKind::Unauthorized, message)
}

/// Resolves the bearer token to an active account and stores the caller as
/// an `Actor` extension for the handlers.
pub async fn require_actor(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let auth_header = req
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("Missing authorization header"))?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| unauthorized("Malformed authorization header"))?;
    let claims = state.jwt_utils.validate_access_token(&token).map_err(|e| {
        warn!("Rejected access token: {}", e);
        unauthorized("Invalid or expired token")
    })?;

    let user_id = ObjectId::parse_str(&claims.sub).map_err(|_| unauthorized("Invalid token subject"))?;
    // the stored role is authoritative, the token's may be stale
    let user = state.user_service.active_user(&user_id).await.map_err(|e| match e {
        ServiceError::NotFound(_) => unauthorized("Unknown user"),
        other => HandlerError::from(other),
    })?;

    debug!("Authenticated {} as {}", user.id, user.role);
    req.extensions_mut().insert(Actor::new(user.id, user.role));
    Ok(next.run(req).await)
}
