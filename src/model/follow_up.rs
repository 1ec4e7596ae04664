use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::inquiry::LeadStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpType {
    #[default]
    Call,
    Email,
    Whatsapp,
}

/// Temperature recorded by Presales on a follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PresalesStatus {
    Hot,
    #[default]
    Warm,
    Cold,
}

impl PresalesStatus {
    pub fn to_status(self) -> LeadStatus {
        match self {
            PresalesStatus::Hot => LeadStatus::Hot,
            PresalesStatus::Warm => LeadStatus::Warm,
            PresalesStatus::Cold => LeadStatus::Cold,
        }
    }
}

/// Sales pipeline stage. Labels are the persisted form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeadStage {
    Cold,
    Warm,
    Hot,
    #[serde(rename = "Not Interested")]
    NotInterested,
    Walkin,
    #[serde(rename = "Online-Conversion")]
    OnlineConversion,
}

impl LeadStage {
    pub const ALL: [LeadStage; 6] = [
        LeadStage::Cold,
        LeadStage::Warm,
        LeadStage::Hot,
        LeadStage::NotInterested,
        LeadStage::Walkin,
        LeadStage::OnlineConversion,
    ];

    pub fn from_label(label: &str) -> Option<LeadStage> {
        LeadStage::ALL.into_iter().find(|stage| stage.label() == label)
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadStage::Cold => "Cold",
            LeadStage::Warm => "Warm",
            LeadStage::Hot => "Hot",
            LeadStage::NotInterested => "Not Interested",
            LeadStage::Walkin => "Walkin",
            LeadStage::OnlineConversion => "Online-Conversion",
        }
    }

    pub fn to_status(self) -> LeadStatus {
        match self {
            LeadStage::Hot => LeadStatus::Hot,
            LeadStage::Warm => LeadStatus::Warm,
            LeadStage::Cold => LeadStatus::Cold,
            LeadStage::NotInterested => LeadStatus::NotInterested,
            LeadStage::Walkin => LeadStatus::Walkin,
            LeadStage::OnlineConversion => LeadStatus::OnlineConversion,
        }
    }
}

/// One interaction with a lead. Immutable once written except through an
/// explicit follow-up update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "type", default)]
    pub kind: FollowUpType,
    pub created_by: ObjectId,
    #[serde(with = "crate::util::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "crate::util::timestamp::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    // Presales
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, with = "crate::util::timestamp::option", skip_serializing_if = "Option::is_none")]
    pub next_follow_up_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub inquiry_status: PresalesStatus,

    // Sales
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lead_stage: Option<LeadStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
