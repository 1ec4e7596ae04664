use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handler::follow_up_handler::{add_follow_up_handler, delete_follow_up_handler, update_follow_up_handler};
use crate::handler::inquiry_handler::{
    assign_inquiry_handler, check_phone_handler, claim_inquiry_handler, create_inquiry_handler, delete_inquiry_handler,
    forward_to_sales_handler, get_inquiry_handler, list_admitted_handler, list_inquiries_handler,
    move_to_unattended_handler, reassign_to_presales_handler, reassign_to_sales_handler, update_inquiry_handler,
    InquiryState,
};
use crate::middlewares::auth_middleware::{require_actor, AuthState};

pub fn inquiry_router(service: InquiryState, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/inquiries", get(list_inquiries_handler).post(create_inquiry_handler))
        .route("/inquiries/check-phone", get(check_phone_handler))
        .route("/inquiries/admitted", get(list_admitted_handler))
        .route(
            "/inquiries/{id}",
            get(get_inquiry_handler).put(update_inquiry_handler).delete(delete_inquiry_handler),
        )
        .route("/inquiries/{id}/assign", post(assign_inquiry_handler))
        .route("/inquiries/{id}/claim", post(claim_inquiry_handler))
        .route("/inquiries/{id}/forward", post(forward_to_sales_handler))
        .route("/inquiries/{id}/reassign/presales", post(reassign_to_presales_handler))
        .route("/inquiries/{id}/reassign/sales", post(reassign_to_sales_handler))
        .route("/inquiries/{id}/unattend", post(move_to_unattended_handler))
        .route("/inquiries/{id}/follow-ups", post(add_follow_up_handler))
        .route(
            "/inquiries/{id}/follow-ups/{follow_up_id}",
            put(update_follow_up_handler).delete(delete_follow_up_handler),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, require_actor))
        .with_state(service)
}
