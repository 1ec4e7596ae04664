//! Ownership state machine. Each function checks an actor's request against
//! the record as read and returns the guarded write that performs it; the
//! guard is re-checked atomically by the store.

use crate::model::inquiry::{AssignmentStatus, Department, Inquiry};
use crate::model::user::{Actor, Role, User};
use crate::repository::query::{InquiryQuery, InquiryUpdate};
use crate::util::error::ServiceError;

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub guard: InquiryQuery,
    pub update: InquiryUpdate,
}

/// Guard that fails if ownership or department moved since the read.
fn unchanged(inquiry: &Inquiry) -> InquiryQuery {
    let owner = match inquiry.assigned_to {
        Some(owner) => InquiryQuery::AssignedTo(owner),
        None => InquiryQuery::Unassigned,
    };
    InquiryQuery::Department(inquiry.department).and(owner)
}

fn owned_by(target: &User, status: AssignmentStatus) -> InquiryUpdate {
    InquiryUpdate {
        assigned_to: Some(Some(target.id)),
        assignment_status: Some(status),
        pending_first_follow_up: Some(false),
        ..Default::default()
    }
}

fn denied(msg: &str) -> ServiceError {
    ServiceError::AccessDenied(msg.to_string())
}

fn require_active(target: &User, role: Role) -> Result<(), ServiceError> {
    if target.role != role || !target.is_active {
        return Err(ServiceError::InvalidInput(format!(
            "Target user must be an active {} user",
            role
        )));
    }
    Ok(())
}

pub fn ensure_can_assign(actor: &Actor) -> Result<(), ServiceError> {
    if !actor.is_any(&[Role::Presales, Role::Admin]) {
        return Err(denied("Only presales or admin users can assign inquiries"));
    }
    Ok(())
}

pub fn assign(actor: &Actor, inquiry: &Inquiry, target: &User) -> Result<Transition, ServiceError> {
    ensure_can_assign(actor)?;
    let mut update = owned_by(target, AssignmentStatus::Assigned);
    update.department = Some(Department::Presales);
    Ok(Transition {
        guard: unchanged(inquiry),
        update,
    })
}

pub fn claim(actor: &Actor, inquiry: &Inquiry) -> Result<Transition, ServiceError> {
    let allowed = match actor.role {
        Role::Sales | Role::Admin => inquiry.department == Department::Sales,
        Role::Presales => inquiry.department == Department::Presales,
        Role::User => false,
    };
    if inquiry.assigned_to.is_some() {
        return Err(ServiceError::Conflict("Inquiry is already assigned".to_string()));
    }
    if !allowed {
        return Err(denied(&format!(
            "A {} user cannot claim a {} inquiry",
            actor.role, inquiry.department
        )));
    }
    Ok(Transition {
        guard: InquiryQuery::Unassigned.and(InquiryQuery::Department(inquiry.department)),
        update: InquiryUpdate {
            assigned_to: Some(Some(actor.id)),
            assignment_status: Some(AssignmentStatus::Assigned),
            pending_first_follow_up: Some(inquiry.department == Department::Sales),
            ..Default::default()
        },
    })
}

pub fn forward_to_sales(actor: &Actor, inquiry: &Inquiry) -> Result<Transition, ServiceError> {
    if !(actor.is_any(&[Role::Presales, Role::Admin]) || inquiry.is_owned_by(&actor.id)) {
        return Err(denied("Only presales, admin or the owner can forward an inquiry"));
    }
    if inquiry.department != Department::Presales {
        return Err(ServiceError::InvalidInput("Only presales inquiries can be forwarded to sales".to_string()));
    }
    Ok(Transition {
        guard: unchanged(inquiry),
        update: InquiryUpdate {
            forwarded_by: Some(inquiry.assigned_to.unwrap_or(actor.id)),
            department: Some(Department::Sales),
            assignment_status: Some(AssignmentStatus::ForwardedToSales),
            assigned_to: Some(None),
            pending_first_follow_up: Some(false),
            ..Default::default()
        },
    })
}

/// Push to another member of the record's current department.
pub fn reassign(actor: &Actor, inquiry: &Inquiry, department: Department, target: &User) -> Result<Transition, ServiceError> {
    let (department_role, label) = match department {
        Department::Presales => (Role::Presales, "presales"),
        Department::Sales => (Role::Sales, "sales"),
    };
    if !(actor.is_any(&[department_role, Role::Admin]) || inquiry.is_owned_by(&actor.id)) {
        return Err(denied(&format!("Only {}, admin or the owner can reassign this inquiry", label)));
    }
    if inquiry.department != department {
        return Err(ServiceError::InvalidInput(format!("Inquiry is not in the {} department", label)));
    }
    require_active(target, department_role)?;
    Ok(Transition {
        guard: unchanged(inquiry),
        update: owned_by(target, AssignmentStatus::Reassigned),
    })
}

pub fn move_to_unattended(actor: &Actor, inquiry: &Inquiry) -> Result<Transition, ServiceError> {
    if !actor.is_any(&[Role::Sales, Role::Presales, Role::Admin]) {
        return Err(denied("Only sales, presales or admin users can release inquiries"));
    }
    let Some(owner) = inquiry.assigned_to else {
        return Err(ServiceError::InvalidInput("Inquiry is already unattended".to_string()));
    };
    if actor.is(Role::Sales) && inquiry.department != Department::Sales {
        return Err(denied("Sales users can only release sales inquiries"));
    }
    if inquiry.pending_first_follow_up && owner == actor.id && !actor.is(Role::Admin) {
        return Err(ServiceError::InvalidInput(
            "Add a follow-up before releasing an inquiry you claimed".to_string(),
        ));
    }
    Ok(Transition {
        guard: unchanged(inquiry),
        update: InquiryUpdate {
            assigned_to: Some(None),
            assignment_status: Some(AssignmentStatus::NotAssigned),
            pending_first_follow_up: Some(false),
            ..Default::default()
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::inquiry::LeadStatus;
    use crate::util::timestamp;
    use bson::oid::ObjectId;

    fn lead(department: Department) -> Inquiry {
        let now = timestamp::now();
        Inquiry {
            id: ObjectId::new(),
            name: "Sana".to_string(),
            phone: "+911234567890".to_string(),
            email: None,
            city: "Bangalore".to_string(),
            education: "BCA".to_string(),
            course: "UI/UX Design".to_string(),
            preferred_location: "Bangalore".to_string(),
            medium: "Referral".to_string(),
            message: None,
            created_by: ObjectId::new(),
            department,
            assignment_status: AssignmentStatus::NotAssigned,
            assigned_to: None,
            forwarded_by: None,
            status: LeadStatus::Warm,
            pending_first_follow_up: false,
            follow_ups: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn user(role: Role) -> User {
        User {
            id: ObjectId::new(),
            first_name: "Test".to_string(),
            last_name: role.as_str().to_string(),
            email: format!("{}@example.com", role),
            role,
            is_active: true,
            created_at: None,
            updated_at: None,
        }
    }

    fn apply(inquiry: &Inquiry, t: &Transition) -> Inquiry {
        assert!(t.guard.matches(inquiry));
        let mut next = inquiry.clone();
        t.update.apply(&mut next, timestamp::now());
        assert!(next.ownership_is_consistent());
        next
    }

    #[test]
    fn test_claim_rules() {
        let presales = Actor::new(ObjectId::new(), Role::Presales);
        let admin = Actor::new(ObjectId::new(), Role::Admin);
        let sales = Actor::new(ObjectId::new(), Role::Sales);

        let claimed = apply(&lead(Department::Presales), &claim(&presales, &lead(Department::Presales)).unwrap());
        assert_eq!(claimed.assigned_to, Some(presales.id));
        assert!(!claimed.pending_first_follow_up);

        assert!(matches!(claim(&admin, &lead(Department::Presales)), Err(ServiceError::AccessDenied(_))));
        assert!(matches!(claim(&sales, &lead(Department::Presales)), Err(ServiceError::AccessDenied(_))));
        assert!(matches!(claim(&presales, &claimed), Err(ServiceError::Conflict(_))));

        let sales_lead = lead(Department::Sales);
        let taken = apply(&sales_lead, &claim(&sales, &sales_lead).unwrap());
        assert!(taken.pending_first_follow_up);
    }

    #[test]
    fn test_pending_follow_up_blocks_only_the_claimer() {
        let sales = Actor::new(ObjectId::new(), Role::Sales);
        let sales_lead = lead(Department::Sales);
        let taken = apply(&sales_lead, &claim(&sales, &sales_lead).unwrap());

        assert!(matches!(move_to_unattended(&sales, &taken), Err(ServiceError::InvalidInput(_))));

        let colleague = Actor::new(ObjectId::new(), Role::Sales);
        let released = apply(&taken, &move_to_unattended(&colleague, &taken).unwrap());
        assert!(!released.pending_first_follow_up);

        // the same owner after promotion to admin
        let promoted = Actor::new(sales.id, Role::Admin);
        let released = apply(&taken, &move_to_unattended(&promoted, &taken).unwrap());
        assert_eq!(released.assigned_to, None);
        assert_eq!(released.assignment_status, AssignmentStatus::NotAssigned);
    }

    #[test]
    fn test_forward_clears_owner_and_records_forwarder() {
        let owner = user(Role::Presales);
        let supervisor = Actor::new(ObjectId::new(), Role::Presales);
        let actor = Actor::new(ObjectId::new(), Role::Admin);
        let owned = apply(&lead(Department::Presales), &assign(&actor, &lead(Department::Presales), &owner).unwrap());

        let forwarded = apply(&owned, &forward_to_sales(&supervisor, &owned).unwrap());
        assert_eq!(forwarded.department, Department::Sales);
        assert_eq!(forwarded.assignment_status, AssignmentStatus::ForwardedToSales);
        assert_eq!(forwarded.assigned_to, None);
        assert_eq!(forwarded.forwarded_by, Some(owner.id));

        assert!(matches!(forward_to_sales(&supervisor, &forwarded), Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn test_forward_unowned_records_actor() {
        let actor = Actor::new(ObjectId::new(), Role::Presales);
        let unowned = lead(Department::Presales);
        let forwarded = apply(&unowned, &forward_to_sales(&actor, &unowned).unwrap());
        assert_eq!(forwarded.forwarded_by, Some(actor.id));
    }

    #[test]
    fn test_reassign_requires_active_target_of_department_role() {
        let admin = Actor::new(ObjectId::new(), Role::Admin);
        let sales_lead = lead(Department::Sales);
        let mut inactive = user(Role::Sales);
        inactive.is_active = false;

        assert!(matches!(
            reassign(&admin, &sales_lead, Department::Sales, &user(Role::Presales)),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            reassign(&admin, &sales_lead, Department::Sales, &inactive),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            reassign(&admin, &sales_lead, Department::Presales, &user(Role::Presales)),
            Err(ServiceError::InvalidInput(_))
        ));

        let target = user(Role::Sales);
        let moved = apply(&sales_lead, &reassign(&admin, &sales_lead, Department::Sales, &target).unwrap());
        assert_eq!(moved.assigned_to, Some(target.id));
        assert_eq!(moved.assignment_status, AssignmentStatus::Reassigned);
    }

    #[test]
    fn test_move_to_unattended() {
        let sales = Actor::new(ObjectId::new(), Role::Sales);
        let sales_lead = lead(Department::Sales);
        let claimed = apply(&sales_lead, &claim(&sales, &sales_lead).unwrap());

        // owner must log a follow-up first
        assert!(matches!(move_to_unattended(&sales, &claimed), Err(ServiceError::InvalidInput(_))));

        let admin = Actor::new(ObjectId::new(), Role::Admin);
        let released = apply(&claimed, &move_to_unattended(&admin, &claimed).unwrap());
        assert_eq!(released.assignment_status, AssignmentStatus::NotAssigned);
        assert!(matches!(move_to_unattended(&admin, &released), Err(ServiceError::InvalidInput(_))));

        let mut presales_owned = lead(Department::Presales);
        presales_owned.assigned_to = Some(ObjectId::new());
        presales_owned.assignment_status = AssignmentStatus::Assigned;
        assert!(matches!(move_to_unattended(&sales, &presales_owned), Err(ServiceError::AccessDenied(_))));
    }

    #[test]
    fn test_stale_guard_rejects_concurrent_change() {
        let admin = Actor::new(ObjectId::new(), Role::Admin);
        let presales_lead = lead(Department::Presales);
        let t = forward_to_sales(&admin, &presales_lead).unwrap();

        let mut raced = presales_lead.clone();
        raced.assigned_to = Some(ObjectId::new());
        raced.assignment_status = AssignmentStatus::Assigned;
        assert!(!t.guard.matches(&raced));
    }
}
