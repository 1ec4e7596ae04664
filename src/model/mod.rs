pub mod activity;
pub mod follow_up;
pub mod inquiry;
pub mod settings;
pub mod user;
