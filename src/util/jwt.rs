use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use crate::config::JwtConfig;

/// Claims carried by an access token issued by the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ObjectId hex)
    pub sub: String,
    pub email: String,
    /// admin, user, presales or sales
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
    pub jti: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub iss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aud: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("Failed to encode JWT token: {0}")]
    EncodingFailed(String),
    #[error("Failed to decode JWT token: {0}")]
    DecodingFailed(String),
    #[error("Token has expired")]
    TokenExpired,
    #[error("Invalid token format")]
    InvalidToken,
    #[error("Invalid token type: expected {expected}, got {actual}")]
    InvalidTokenType { expected: String, actual: String },
}

const ACCESS_TOKEN: &str = "access";

pub trait JwtTokenUtils {
    fn generate_access_token(&self, user_id: &str, email: &str, role: &str) -> Result<String, JwtError>;
    fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError>;
    fn extract_token_from_header(&self, auth_header: &str) -> Result<String, JwtError>;
}

#[derive(Debug, Clone)]
pub struct JwtTokenUtilsImpl {
    pub jwt_config: JwtConfig,
}

impl JwtTokenUtilsImpl {
    pub fn new(jwt_config: JwtConfig) -> Self {
        JwtTokenUtilsImpl { jwt_config }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(ref issuer) = self.jwt_config.jwt_issuer {
            validation.set_issuer(&[issuer]);
        }
        match self.jwt_config.jwt_audience {
            Some(ref audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation
    }
}

impl JwtTokenUtils for JwtTokenUtilsImpl {
    fn generate_access_token(&self, user_id: &str, email: &str, role: &str) -> Result<String, JwtError> {
        debug!("Generating access token for user: {} with role: {}", user_id, role);

        let now = Utc::now();
        let expiration = now + Duration::minutes(self.jwt_config.access_token_expiration);
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            token_type: ACCESS_TOKEN.to_string(),
            jti: Uuid::new_v4().to_string(),
            iss: self.jwt_config.jwt_issuer.clone(),
            aud: self.jwt_config.jwt_audience.clone(),
        };

        let encoding_key = EncodingKey::from_secret(self.jwt_config.jwt_secret.as_ref());
        encode(&Header::new(Algorithm::HS256), &claims, &encoding_key).map_err(|err| {
            error!("Failed to encode JWT token: {}", err);
            JwtError::EncodingFailed(err.to_string())
        })
    }

    fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        debug!("Validating JWT token");
        let decoding_key = DecodingKey::from_secret(self.jwt_config.jwt_secret.as_ref());

        let claims = match decode::<Claims>(token, &decoding_key, &self.validation()) {
            Ok(data) => data.claims,
            Err(err) => {
                if matches!(err.kind(), jsonwebtoken::errors::ErrorKind::ExpiredSignature) {
                    warn!("Token has expired");
                    return Err(JwtError::TokenExpired);
                }
                error!("Failed to decode JWT token: {}", err);
                return Err(JwtError::DecodingFailed(err.to_string()));
            }
        };

        if claims.token_type != ACCESS_TOKEN {
            error!("Invalid token type: expected {}, got {}", ACCESS_TOKEN, claims.token_type);
            return Err(JwtError::InvalidTokenType {
                expected: ACCESS_TOKEN.to_string(),
                actual: claims.token_type.clone(),
            });
        }

        info!("Token validation successful for user: {}", claims.sub);
        Ok(claims)
    }

    fn extract_token_from_header(&self, auth_header: &str) -> Result<String, JwtError> {
        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(|| {
                error!("Invalid authorization header format");
                JwtError::InvalidToken
            })?;
        if token.is_empty() {
            error!("Empty token in authorization header");
            return Err(JwtError::InvalidToken);
        }
        Ok(token.to_string())
    }
}
