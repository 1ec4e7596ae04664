pub mod dashboard_router;
pub mod inquiry_router;
pub mod settings_router;
pub mod user_router;
