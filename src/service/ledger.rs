//! Follow-up ledger rules: building entries, deriving the lead temperature
//! and classifying admissions. Everything here is pure.

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};

use crate::dto::follow_up_dto::FollowUpRequest;
use crate::model::follow_up::{FollowUp, LeadStage};
use crate::model::inquiry::{Department, Inquiry, LeadStatus};
use crate::model::settings::OptionSettings;
use crate::model::user::{Actor, Role};
use crate::util::error::ServiceError;

pub const ADMISSION_SUB_STAGE: &str = "Confirmed Admission";

fn is_admission(follow_up: &FollowUp) -> bool {
    follow_up.lead_stage == Some(LeadStage::Hot) && follow_up.sub_stage.as_deref() == Some(ADMISSION_SUB_STAGE)
}

/// Latest entry by creation time; on equal timestamps the later-appended one.
pub fn latest(follow_ups: &[FollowUp]) -> Option<&FollowUp> {
    follow_ups.iter().max_by_key(|f| f.created_at)
}

pub fn is_admitted(follow_ups: &[FollowUp]) -> bool {
    latest(follow_ups).map(is_admission).unwrap_or(false)
}

/// Creation time of the most recent admission entry, which need not be the
/// most recent follow-up overall.
pub fn admission_date(follow_ups: &[FollowUp]) -> Option<DateTime<Utc>> {
    follow_ups.iter().filter(|f| is_admission(f)).map(|f| f.created_at).max()
}

/// Status implied by a payload, using only explicitly supplied values.
pub fn derive_status(department: Department, request: &FollowUpRequest) -> Option<LeadStatus> {
    match (department, request.lead_stage, request.inquiry_status) {
        (Department::Sales, Some(stage), _) => Some(stage.to_status()),
        (_, _, Some(status)) => Some(status.to_status()),
        _ => None,
    }
}

/// Sub-stages are checked against the catalog only at write time.
pub fn validate_against_catalog(request: &FollowUpRequest, settings: &OptionSettings) -> Result<(), ServiceError> {
    let Some(stage) = request.lead_stage else {
        if request.sub_stage.is_some() {
            return Err(ServiceError::validation("subStage", "subStage requires a leadStage"));
        }
        return Ok(());
    };
    let option = settings
        .lead_stage(stage.label())
        .ok_or_else(|| ServiceError::validation("leadStage", format!("'{}' is not a configured lead stage", stage.label())))?;
    if let Some(ref sub_stage) = request.sub_stage {
        if !option.sub_stages.iter().any(|s| s == sub_stage) {
            return Err(ServiceError::validation(
                "subStage",
                format!("'{}' is not a sub-stage of '{}'", sub_stage, stage.label()),
            ));
        }
    }
    Ok(())
}

pub fn build(actor: &Actor, request: &FollowUpRequest, now: DateTime<Utc>) -> FollowUp {
    FollowUp {
        id: ObjectId::new(),
        kind: request.kind.unwrap_or_default(),
        created_by: actor.id,
        created_at: now,
        updated_at: None,
        title: request.title.clone(),
        next_follow_up_date: request.next_follow_up_date,
        inquiry_status: request.inquiry_status.unwrap_or_default(),
        lead_stage: request.lead_stage,
        sub_stage: request.sub_stage.clone(),
        message: request.message.clone(),
    }
}

/// Overlays the supplied fields on a stored entry. Author and creation time
/// never change.
pub fn merge(existing: &FollowUp, request: &FollowUpRequest, now: DateTime<Utc>) -> FollowUp {
    let mut merged = existing.clone();
    if let Some(kind) = request.kind {
        merged.kind = kind;
    }
    if request.title.is_some() {
        merged.title = request.title.clone();
    }
    if request.next_follow_up_date.is_some() {
        merged.next_follow_up_date = request.next_follow_up_date;
    }
    if let Some(status) = request.inquiry_status {
        merged.inquiry_status = status;
    }
    if request.lead_stage.is_some() {
        merged.lead_stage = request.lead_stage;
    }
    if request.sub_stage.is_some() {
        merged.sub_stage = request.sub_stage.clone();
    }
    if request.message.is_some() {
        merged.message = request.message.clone();
    }
    merged.updated_at = Some(now);
    merged
}

pub fn can_add(actor: &Actor, inquiry: &Inquiry) -> bool {
    actor.is_any(&[Role::Admin, Role::Presales, Role::Sales])
        || inquiry.created_by == actor.id
        || inquiry.is_owned_by(&actor.id)
}

pub fn can_update(actor: &Actor, inquiry: &Inquiry, follow_up: &FollowUp) -> bool {
    can_add(actor, inquiry) || follow_up.created_by == actor.id
}

pub fn can_delete(actor: &Actor, follow_up: &FollowUp) -> bool {
    actor.is_any(&[Role::Admin, Role::Presales]) || follow_up.created_by == actor.id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::follow_up::PresalesStatus;
    use crate::util::timestamp;

    fn entry(stage: LeadStage, sub_stage: &str, created_at: DateTime<Utc>) -> FollowUp {
        let request = FollowUpRequest {
            lead_stage: Some(stage),
            sub_stage: Some(sub_stage.to_string()),
            ..Default::default()
        };
        build(&Actor::new(ObjectId::new(), Role::Sales), &request, created_at)
    }

    #[test]
    fn test_admission_follows_latest_entry() {
        let t1 = timestamp::now();
        let t2 = t1 + chrono::Duration::minutes(5);
        let warm = entry(LeadStage::Warm, "Follow-up", t1);
        let admitted = entry(LeadStage::Hot, ADMISSION_SUB_STAGE, t2);

        assert!(is_admitted(&[warm.clone(), admitted.clone()]));

        let mut later_warm = warm.clone();
        later_warm.created_at = t2 + chrono::Duration::minutes(1);
        assert!(!is_admitted(&[admitted.clone(), later_warm.clone()]));
        assert_eq!(admission_date(&[admitted, later_warm]), Some(t2));
        assert!(!is_admitted(&[]));
    }

    #[test]
    fn test_tie_goes_to_last_appended() {
        let t = timestamp::now();
        let admitted = entry(LeadStage::Hot, ADMISSION_SUB_STAGE, t);
        let warm = entry(LeadStage::Warm, "Follow-up", t);
        assert!(!is_admitted(&[admitted.clone(), warm.clone()]));
        assert!(is_admitted(&[warm, admitted]));
    }

    #[test]
    fn test_derive_status() {
        let sales_stage = FollowUpRequest {
            lead_stage: Some(LeadStage::NotInterested),
            inquiry_status: Some(PresalesStatus::Hot),
            ..Default::default()
        };
        assert_eq!(derive_status(Department::Sales, &sales_stage), Some(LeadStatus::NotInterested));
        // lead stages only count in the sales department
        assert_eq!(derive_status(Department::Presales, &sales_stage), Some(LeadStatus::Hot));
        assert_eq!(derive_status(Department::Presales, &FollowUpRequest::default()), None);
    }

    #[test]
    fn test_defaults_applied_on_build() {
        let f = build(&Actor::new(ObjectId::new(), Role::Presales), &FollowUpRequest::default(), timestamp::now());
        assert_eq!(f.kind, crate::model::follow_up::FollowUpType::Call);
        assert_eq!(f.inquiry_status, PresalesStatus::Warm);
    }

    #[test]
    fn test_catalog_validation() {
        let settings = OptionSettings::default();
        let ok = FollowUpRequest {
            lead_stage: Some(LeadStage::Hot),
            sub_stage: Some(ADMISSION_SUB_STAGE.to_string()),
            ..Default::default()
        };
        assert!(validate_against_catalog(&ok, &settings).is_ok());

        let wrong = FollowUpRequest {
            lead_stage: Some(LeadStage::Cold),
            sub_stage: Some(ADMISSION_SUB_STAGE.to_string()),
            ..Default::default()
        };
        assert!(matches!(
            validate_against_catalog(&wrong, &settings),
            Err(ServiceError::Validation { ref field, .. }) if field == "subStage"
        ));
    }
}
