use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::dto::user_dto::UserSummary;
use crate::model::follow_up::{FollowUp, FollowUpType, LeadStage, PresalesStatus};
use crate::util::timestamp;

/// Payload of both add and update. On update, absent fields keep their
/// stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpRequest {
    #[serde(rename = "type")]
    pub kind: Option<FollowUpType>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default, with = "crate::util::timestamp::option")]
    pub next_follow_up_date: Option<DateTime<Utc>>,
    pub inquiry_status: Option<PresalesStatus>,
    pub lead_stage: Option<LeadStage>,
    #[validate(length(min = 1, max = 100))]
    pub sub_stage: Option<String>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpView {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FollowUpType,
    pub created_by: UserSummary,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub title: Option<String>,
    pub next_follow_up_date: Option<String>,
    pub inquiry_status: PresalesStatus,
    pub lead_stage: Option<LeadStage>,
    pub sub_stage: Option<String>,
    pub message: Option<String>,
}

impl FollowUpView {
    pub fn new(follow_up: &FollowUp, created_by: UserSummary) -> Self {
        FollowUpView {
            id: follow_up.id.to_hex(),
            kind: follow_up.kind,
            created_by,
            created_at: timestamp::format(&follow_up.created_at),
            updated_at: follow_up.updated_at.as_ref().map(timestamp::format),
            title: follow_up.title.clone(),
            next_follow_up_date: follow_up.next_follow_up_date.as_ref().map(timestamp::format),
            inquiry_status: follow_up.inquiry_status,
            lead_stage: follow_up.lead_stage,
            sub_stage: follow_up.sub_stage.clone(),
            message: follow_up.message.clone(),
        }
    }
}
