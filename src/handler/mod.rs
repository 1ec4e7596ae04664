pub mod dashboard_handler;
pub mod extract;
pub mod follow_up_handler;
pub mod inquiry_handler;
pub mod settings_handler;
pub mod user_handler;
