pub mod assignment;
pub mod dashboard_service;
pub mod inquiry_service;
pub mod ledger;
pub mod settings_service;
pub mod user_service;
pub mod views;
pub mod visibility;
