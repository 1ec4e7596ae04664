use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Best-effort audit trail entry written after lifecycle transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub actor: ObjectId,
    pub action: String,
    pub inquiry_id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(with = "crate::util::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(actor: ObjectId, action: &str, inquiry_id: ObjectId, detail: Option<String>) -> Self {
        ActivityEntry {
            id: ObjectId::new(),
            actor,
            action: action.to_string(),
            inquiry_id,
            detail,
            created_at: crate::util::timestamp::now(),
        }
    }
}

/// Outbox record picked up by whatever delivers notifications to people.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub recipient: ObjectId,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inquiry_id: Option<ObjectId>,
    #[serde(default)]
    pub read: bool,
    #[serde(with = "crate::util::timestamp")]
    pub created_at: DateTime<Utc>,
}
