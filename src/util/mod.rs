pub mod error;
pub mod jwt;
pub mod logger;
pub mod notifier;
pub mod phone;
pub mod timestamp;
