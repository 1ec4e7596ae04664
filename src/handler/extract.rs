use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use tracing::warn;

use crate::util::error::{HandlerError, HandlerErrorKind};

/// JSON body extractor whose rejection is a `HandlerError`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(HandlerError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejection is a `HandlerError`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(HandlerError))]
pub struct ApiQuery<T>(pub T);

/// Pulls the offending field out of a serde rejection text such as
/// `"Failed to deserialize ...: leadStage: unknown variant ..."`.
fn rejected_field(text: &str) -> Option<String> {
    let mut parts = text.splitn(3, ": ");
    parts.next()?;
    let field = parts.next()?;
    parts.next()?;
    let plain = !field.is_empty() && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '[' || c == ']');
    plain.then(|| field.to_string())
}

fn rejected(kind: HandlerErrorKind, message: &str, text: String) -> HandlerError {
    warn!("Request rejected: {}", text);
    let err = HandlerError::new(kind, message);
    match rejected_field(&text) {
        Some(field) => err.with_details(field),
        None => err,
    }
}

impl From<JsonRejection> for HandlerError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => {
                rejected(HandlerErrorKind::Validation, "Request body has an invalid field", e.body_text())
            }
            JsonRejection::JsonSyntaxError(e) => {
                rejected(HandlerErrorKind::BadRequest, "Request body is not valid JSON", e.body_text())
            }
            JsonRejection::MissingJsonContentType(e) => {
                rejected(HandlerErrorKind::BadRequest, "Expected a JSON request body", e.body_text())
            }
            other => rejected(HandlerErrorKind::BadRequest, "Request body could not be read", other.body_text()),
        }
    }
}

impl From<QueryRejection> for HandlerError {
    fn from(rejection: QueryRejection) -> Self {
        rejected(HandlerErrorKind::Validation, "Query string has an invalid parameter", rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_field() {
        assert_eq!(
            rejected_field("Failed to deserialize the JSON body into the target type: leadStage: unknown variant `Lost`"),
            Some("leadStage".to_string())
        );
        assert_eq!(
            rejected_field("Failed to deserialize query string: department: unknown variant `marketing`"),
            Some("department".to_string())
        );
        assert_eq!(rejected_field("Failed to parse the request body as JSON: expected value at line 1"), None);
        assert_eq!(rejected_field("Expected request with `Content-Type: application/json`"), None);
    }
}
