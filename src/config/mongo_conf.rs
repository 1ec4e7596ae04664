use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// MongoDB configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    /// MongoDB connection URI
    pub uri: String,
    /// Database name
    pub database: String,
    /// Username for authentication (optional)
    pub username: Option<String>,
    /// Password for authentication (optional)
    pub password: Option<String>,
    /// Collection name for inquiries (optional, defaults to `inquiries`)
    pub inquiry_collection: Option<String>,
    /// Connection pool size
    pub pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
}

impl MongoConfig {
    /// Load MongoDB configuration from environment variables
    ///
    /// - MONGO_URI, MONGO_DATABASE: required
    /// - MONGO_USERNAME, MONGO_PASSWORD: optional credentials
    /// - MONGO_INQUIRY_COLLECTION: defaults to `inquiries`
    /// - MONGO_POOL_SIZE: defaults to 10
    /// - MONGO_CONNECTION_TIMEOUT: seconds, defaults to 5
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MongoDB configuration from environment variables");

        let required = |name: &str| {
            env::var(name).map_err(|_| {
                error!("{} environment variable not found", name);
                ConfigError::EnvVarNotFound(name.to_string())
            })
        };
        let uri = required("MONGO_URI")?;
        let database = required("MONGO_DATABASE")?;
        debug!("MongoDB database: {}", database);

        let config = MongoConfig {
            uri,
            database,
            username: env::var("MONGO_USERNAME").ok(),
            password: env::var("MONGO_PASSWORD").ok(),
            inquiry_collection: env::var("MONGO_INQUIRY_COLLECTION").ok(),
            pool_size: parse_or_default("MONGO_POOL_SIZE", 10)?,
            connection_timeout_secs: parse_or_default("MONGO_CONNECTION_TIMEOUT", 5)?,
        };

        config.validate()?;
        info!(collection = config.inquiry_collection(), "MongoDB configuration loaded successfully");
        Ok(config)
    }

    /// Fixed configuration for tests.
    pub fn from_test_env() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "test_db".to_string(),
            username: Some("testuser".to_string()),
            password: Some("testpass".to_string()),
            inquiry_collection: Some("test_inquiries".to_string()),
            pool_size: 2,
            connection_timeout_secs: 2,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        debug!("Validating MongoDB configuration");
        let problem = if self.uri.is_empty() {
            Some("MongoDB URI cannot be empty")
        } else if self.database.is_empty() {
            Some("MongoDB database cannot be empty")
        } else if self.pool_size == 0 {
            Some("MongoDB pool size must be greater than 0")
        } else if self.connection_timeout_secs == 0 {
            Some("MongoDB connection timeout must be greater than 0")
        } else if self.username.as_deref() == Some("") || self.password.as_deref() == Some("") {
            Some("MongoDB credentials cannot be empty if set")
        } else {
            None
        };
        match problem {
            Some(message) => {
                error!("{}", message);
                Err(ConfigError::ValidationError(message.to_string()))
            }
            None => Ok(()),
        }
    }

    /// Inquiry collection name, `inquiries` unless overridden
    pub fn inquiry_collection(&self) -> &str {
        self.inquiry_collection.as_deref().unwrap_or("inquiries")
    }

    /// Opens a client with the pool, timeout and credential settings applied
    /// and returns the configured database handle.
    pub async fn connect(&self) -> Result<mongodb::Database, mongodb::error::Error> {
        use mongodb::{options::{ClientOptions, Credential}, Client};

        let mut client_options = ClientOptions::parse(&self.uri).await?;
        client_options.app_name = Some("LeadflowBackend".to_string());
        client_options.max_pool_size = Some(self.pool_size);
        client_options.connect_timeout = Some(std::time::Duration::from_secs(self.connection_timeout_secs));
        if let (Some(ref username), Some(ref password)) = (&self.username, &self.password) {
            client_options.credential = Some(Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build());
        }
        let client = Client::with_options(client_options)?;
        info!(database = %self.database, "MongoDB client created");
        Ok(client.database(&self.database))
    }
}

fn parse_or_default<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.parse::<T>().map_err(|_| {
            error!("Invalid {} value: {}", name, raw);
            ConfigError::InvalidValue(format!("Invalid {} value", name))
        }),
        Err(_) => {
            warn!("{} not set, using default: {}", name, default);
            Ok(default)
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "leadflow".to_string(),
            username: None,
            password: None,
            inquiry_collection: Some("inquiries".to_string()),
            pool_size: 10,
            connection_timeout_secs: 5,
        }
    }
}
