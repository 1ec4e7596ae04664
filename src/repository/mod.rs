pub mod activity_repo;
pub mod inquiry_repo;
pub mod memory;
pub mod notification_repo;
pub mod query;
pub mod repository_error;
pub mod settings_repo;
pub mod user_repo;
