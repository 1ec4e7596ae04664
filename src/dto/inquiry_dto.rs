use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::follow_up_dto::FollowUpView;
use crate::dto::user_dto::UserSummary;
use crate::model::inquiry::{AssignmentStatus, Department, LeadStatus};
use crate::util::phone::validate_phone;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInquiryRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub city: String,

    #[validate(length(min = 1, max = 100))]
    pub education: String,

    #[validate(length(min = 1, max = 100))]
    pub course: String,

    #[validate(length(min = 1, max = 100))]
    pub preferred_location: String,

    #[validate(length(min = 1, max = 100))]
    pub medium: String,

    #[validate(length(max = 2000))]
    pub message: Option<String>,

    pub status: Option<LeadStatus>,
}

/// Partial update of the lead's own facts. Lifecycle fields only change
/// through the dedicated transitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInquiryRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub education: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub course: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub preferred_location: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub medium: Option<String>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
    pub status: Option<LeadStatus>,
}

/// Query string of the list endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInquiriesQuery {
    pub search: Option<String>,
    pub department: Option<Department>,
    pub assignment_status: Option<AssignmentStatus>,
    /// `me` (or the caller's own id) selects the "my attended" view; any
    /// other id is a plain owner filter.
    pub assigned_to: Option<String>,
    pub course: Option<String>,
    #[serde(alias = "location")]
    pub preferred_location: Option<String>,
    pub medium: Option<String>,
    pub status: Option<LeadStatus>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub include_admitted: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[serde(alias = "assignedTo", alias = "targetUserId")]
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckPhoneQuery {
    pub phone: String,
}

/// Inquiry with every user reference resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryView {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub city: String,
    pub education: String,
    pub course: String,
    pub preferred_location: String,
    pub medium: String,
    pub message: Option<String>,
    pub department: Department,
    pub assignment_status: AssignmentStatus,
    pub status: LeadStatus,
    pub pending_first_follow_up: bool,
    pub is_admitted: bool,
    pub created_by: UserSummary,
    pub assigned_to: Option<UserSummary>,
    pub forwarded_by: Option<UserSummary>,
    pub follow_ups: Vec<FollowUpView>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryPage {
    pub inquiries: Vec<InquiryView>,
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneMatch {
    pub id: String,
    pub name: String,
    pub department: Department,
    pub assignment_status: AssignmentStatus,
    pub assigned_to: Option<UserSummary>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneCheckResponse {
    pub exists: bool,
    pub inquiry: Option<PhoneMatch>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmittedStudent {
    #[serde(flatten)]
    pub inquiry: InquiryView,
    pub admission_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(phone: &str) -> CreateInquiryRequest {
        CreateInquiryRequest {
            name: "Kiran Rao".to_string(),
            phone: phone.to_string(),
            email: Some("kiran@example.com".to_string()),
            city: "Pune".to_string(),
            education: "BE".to_string(),
            course: "Data Science".to_string(),
            preferred_location: "Pune".to_string(),
            medium: "Website".to_string(),
            message: None,
            status: None,
        }
    }

    #[test]
    fn test_create_request_phone_rules() {
        assert!(request("+911234567890").validate().is_ok());
        let errs = request("1234567890").validate().unwrap_err();
        assert!(errs.field_errors().contains_key("phone"));
    }

    #[test]
    fn test_create_request_rejects_bad_email() {
        let mut r = request("+911234567890");
        r.email = Some("not-an-email".to_string());
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_list_query_accepts_location_alias() {
        let q: ListInquiriesQuery = serde_json::from_str(r#"{"location":"Pune","includeAdmitted":true}"#).unwrap();
        assert_eq!(q.preferred_location.as_deref(), Some("Pune"));
        assert_eq!(q.include_admitted, Some(true));
    }
}
