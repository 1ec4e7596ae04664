use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::follow_up::FollowUp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Presales,
    Sales,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Presales => "presales",
            Department::Sales => "sales",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    NotAssigned,
    Assigned,
    Reassigned,
    ForwardedToSales,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::NotAssigned => "not_assigned",
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Reassigned => "reassigned",
            AssignmentStatus::ForwardedToSales => "forwarded_to_sales",
        }
    }

    /// Statuses under which the record must carry an owner.
    pub fn requires_owner(&self) -> bool {
        matches!(self, AssignmentStatus::Assigned | AssignmentStatus::Reassigned)
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse temperature of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Hot,
    #[default]
    Warm,
    Cold,
    Walkin,
    NotInterested,
    OnlineConversion,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Hot => "hot",
            LeadStatus::Warm => "warm",
            LeadStatus::Cold => "cold",
            LeadStatus::Walkin => "walkin",
            LeadStatus::NotInterested => "not_interested",
            LeadStatus::OnlineConversion => "online_conversion",
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sales lead as persisted in the `inquiries` collection, follow-ups embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub city: String,
    pub education: String,
    pub course: String,
    pub preferred_location: String,
    pub medium: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_by: ObjectId,

    pub department: Department,
    pub assignment_status: AssignmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forwarded_by: Option<ObjectId>,
    #[serde(default)]
    pub status: LeadStatus,
    /// Set when a Sales lead is claimed, cleared by the owner's first follow-up.
    #[serde(default)]
    pub pending_first_follow_up: bool,

    #[serde(default)]
    pub follow_ups: Vec<FollowUp>,

    #[serde(with = "crate::util::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::util::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Inquiry {
    pub fn is_owned_by(&self, user: &ObjectId) -> bool {
        self.assigned_to.as_ref() == Some(user)
    }

    pub fn follow_up(&self, id: &ObjectId) -> Option<&FollowUp> {
        self.follow_ups.iter().find(|f| &f.id == id)
    }

    /// Owner presence must agree with the assignment status.
    pub fn ownership_is_consistent(&self) -> bool {
        self.assigned_to.is_some() == self.assignment_status.requires_owner()
            && (self.assignment_status != AssignmentStatus::ForwardedToSales
                || self.department == Department::Sales)
    }
}
