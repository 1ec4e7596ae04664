use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// Settings used to verify the access tokens presented by callers.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HS256 secret
    pub jwt_secret: String,
    /// Access token lifetime in minutes
    pub access_token_expiration: i64,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables
    ///
    /// - JWT_SECRET: signing secret, at least 32 characters (required)
    /// - JWT_ACCESS_TOKEN_EXPIRY: access token lifetime in minutes (defaults to 15)
    /// - JWT_ISSUER / JWT_AUDIENCE: checked when present
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading JWT configuration from environment variables");

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| {
            error!("JWT_SECRET environment variable not found");
            ConfigError::EnvVarNotFound("JWT_SECRET".to_string())
        })?;

        let access_token_expiration = env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .unwrap_or_else(|_| {
                warn!("JWT_ACCESS_TOKEN_EXPIRY not set, using default: 15 minutes");
                "15".to_string()
            })
            .parse::<i64>()
            .map_err(|e| {
                error!("Invalid JWT_ACCESS_TOKEN_EXPIRY value: {}", e);
                ConfigError::ParseError(format!("JWT_ACCESS_TOKEN_EXPIRY: {}", e))
            })?;

        let config = JwtConfig {
            jwt_secret,
            access_token_expiration,
            jwt_issuer: env::var("JWT_ISSUER").ok(),
            jwt_audience: env::var("JWT_AUDIENCE").ok(),
        };
        config.validate()?;
        info!("JWT configuration loaded successfully");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        debug!("Validating JWT configuration");

        if self.jwt_secret.len() < 32 {
            error!("JWT secret is too short (minimum 32 characters required)");
            return Err(ConfigError::ValidationError("JWT secret must be at least 32 characters long".to_string()));
        }

        if self.access_token_expiration <= 0 {
            error!("Access token expiration must be greater than 0");
            return Err(ConfigError::ValidationError("Access token expiration must be greater than 0".to_string()));
        }

        Ok(())
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        JwtConfig {
            jwt_secret: "test_secret_key_for_jwt_testing_should_be_long_enough_for_security_purposes".to_string(),
            access_token_expiration: 15,
            jwt_issuer: Some("leadflow-backend-test".to_string()),
            jwt_audience: Some("leadflow-backend-users".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(JwtConfig::default().validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let mut config = JwtConfig::default();
        config.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_expiry_rejected() {
        let mut config = JwtConfig::default();
        config.access_token_expiration = 0;
        assert!(config.validate().is_err());
    }
}
