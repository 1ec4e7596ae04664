use std::env;
use tracing::warn;

/// Where inquiries, users and settings live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    /// Process-local store for development without a database.
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);
        let store = match env::var("APP_STORE").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("mongo") | Err(_) => StoreBackend::Mongo,
            Ok(other) => {
                warn!("Unknown APP_STORE value '{}', falling back to mongo", other);
                StoreBackend::Mongo
            }
        };
        AppConfig { host, port, store }
    }
}
