pub mod dashboard_dto;
pub mod follow_up_dto;
pub mod inquiry_dto;
pub mod settings_dto;
pub mod user_dto;

use bson::oid::ObjectId;
use serde::Serialize;

use crate::util::error::ServiceError;

/// Envelope of every successful response.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse { success: true, data }
    }
}

/// Malformed ids are rejected before any store access.
pub fn parse_object_id(field: &str, value: &str) -> Result<ObjectId, ServiceError> {
    ObjectId::parse_str(value.trim())
        .map_err(|_| ServiceError::validation(field, format!("'{}' is not a valid id", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id("id", &id.to_hex()).unwrap(), id);
        assert_eq!(
            parse_object_id("userId", "not-an-id").unwrap_err(),
            ServiceError::validation("userId", "'not-an-id' is not a valid id")
        );
    }
}
