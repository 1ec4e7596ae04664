//! Which inquiries an actor may see, expressed as typed predicates.

use bson::oid::ObjectId;

use crate::model::inquiry::{AssignmentStatus, Department, Inquiry};
use crate::model::user::{Actor, Role};
use crate::repository::query::InquiryQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityScope {
    Admin(ObjectId),
    /// Plain submitter, bound to what they created.
    User(ObjectId),
    Presales(ObjectId),
    Sales(ObjectId),
}

impl VisibilityScope {
    pub fn for_actor(actor: &Actor) -> Self {
        match actor.role {
            Role::Admin => VisibilityScope::Admin(actor.id),
            Role::User => VisibilityScope::User(actor.id),
            Role::Presales => VisibilityScope::Presales(actor.id),
            Role::Sales => VisibilityScope::Sales(actor.id),
        }
    }

    /// Restriction applied to every list view.
    pub fn default_predicate(&self) -> InquiryQuery {
        match *self {
            VisibilityScope::Admin(_) => InquiryQuery::All,
            VisibilityScope::User(me) => InquiryQuery::CreatedBy(me),
            // a forwarded lead leaves the forwarder's pool
            VisibilityScope::Presales(me) => {
                InquiryQuery::Department(Department::Presales).and(InquiryQuery::ForwardedBy(me).negate())
            }
            VisibilityScope::Sales(_) => InquiryQuery::Department(Department::Sales),
        }
    }

    /// "My attended": replaces the default restriction when the caller asks
    /// for `assignedTo = self`.
    pub fn mine_predicate(&self) -> InquiryQuery {
        match *self {
            VisibilityScope::Admin(me) => InquiryQuery::AssignedTo(me),
            VisibilityScope::User(me) => InquiryQuery::CreatedBy(me).and(InquiryQuery::AssignedTo(me)),
            VisibilityScope::Presales(me) => InquiryQuery::Or(vec![
                InquiryQuery::AssignedTo(me).and(InquiryQuery::Department(Department::Presales)),
                InquiryQuery::all_of([
                    InquiryQuery::ForwardedBy(me),
                    InquiryQuery::AssignmentStatus(AssignmentStatus::ForwardedToSales),
                    InquiryQuery::Department(Department::Sales),
                ]),
            ]),
            VisibilityScope::Sales(me) => {
                InquiryQuery::AssignedTo(me).and(InquiryQuery::Department(Department::Sales))
            }
        }
    }

    /// Department restriction used for duplicate-phone lookups and the
    /// unattended pool. `None` means every department.
    pub fn department(&self) -> Option<Department> {
        match self {
            VisibilityScope::Presales(_) => Some(Department::Presales),
            VisibilityScope::Sales(_) => Some(Department::Sales),
            VisibilityScope::Admin(_) | VisibilityScope::User(_) => None,
        }
    }

    pub fn department_predicate(&self) -> InquiryQuery {
        self.department().map(InquiryQuery::Department).unwrap_or(InquiryQuery::All)
    }

    /// Single-record read access: anything the actor could list, either in
    /// the default view or as "mine", plus what they created.
    pub fn can_view(&self, inquiry: &Inquiry) -> bool {
        let created = match *self {
            VisibilityScope::Admin(_) => true,
            VisibilityScope::User(me) | VisibilityScope::Presales(me) | VisibilityScope::Sales(me) => {
                inquiry.created_by == me
            }
        };
        created || self.default_predicate().matches(inquiry) || self.mine_predicate().matches(inquiry)
    }
}
