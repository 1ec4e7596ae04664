//! Typed predicates and field updates over inquiries.
//!
//! Every `InquiryQuery` can be evaluated in memory (`matches`) and rendered as a
//! MongoDB filter (`to_document`); the two renderings must select the same
//! records. `InquiryUpdate` plays the same role for writes.

use bson::{doc, oid::ObjectId, Bson, Document};
use chrono::{DateTime, Utc};

use crate::model::follow_up::FollowUp;
use crate::model::inquiry::{AssignmentStatus, Department, Inquiry, LeadStatus};
use crate::util::{phone, timestamp};

#[derive(Debug, Clone, PartialEq)]
pub enum InquiryQuery {
    All,
    Department(Department),
    AssignmentStatus(AssignmentStatus),
    AssignedTo(ObjectId),
    Unassigned,
    ForwardedBy(ObjectId),
    CreatedBy(ObjectId),
    Course(String),
    PreferredLocation(String),
    Medium(String),
    Status(LeadStatus),
    Phone(String),
    /// Case-insensitive match on name, email or city; digit-only terms also
    /// match the phone with or without its leading `+`.
    Search(String),
    CreatedBetween {
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
    HasFollowUps,
    Not(Box<InquiryQuery>),
    And(Vec<InquiryQuery>),
    Or(Vec<InquiryQuery>),
}

impl InquiryQuery {
    /// Conjunction that flattens nested `And`s and drops `All`.
    pub fn and(self, other: InquiryQuery) -> InquiryQuery {
        let mut parts = Vec::new();
        for q in [self, other] {
            match q {
                InquiryQuery::All => {}
                InquiryQuery::And(inner) => parts.extend(inner),
                q => parts.push(q),
            }
        }
        match parts.len() {
            0 => InquiryQuery::All,
            1 => parts.remove(0),
            _ => InquiryQuery::And(parts),
        }
    }

    pub fn negate(self) -> InquiryQuery {
        InquiryQuery::Not(Box::new(self))
    }

    pub fn all_of(parts: impl IntoIterator<Item = InquiryQuery>) -> InquiryQuery {
        parts.into_iter().fold(InquiryQuery::All, InquiryQuery::and)
    }

    pub fn matches(&self, inquiry: &Inquiry) -> bool {
        match self {
            InquiryQuery::All => true,
            InquiryQuery::Department(d) => inquiry.department == *d,
            InquiryQuery::AssignmentStatus(s) => inquiry.assignment_status == *s,
            InquiryQuery::AssignedTo(id) => inquiry.assigned_to.as_ref() == Some(id),
            InquiryQuery::Unassigned => inquiry.assigned_to.is_none(),
            InquiryQuery::ForwardedBy(id) => inquiry.forwarded_by.as_ref() == Some(id),
            InquiryQuery::CreatedBy(id) => inquiry.created_by == *id,
            InquiryQuery::Course(c) => inquiry.course == *c,
            InquiryQuery::PreferredLocation(l) => inquiry.preferred_location == *l,
            InquiryQuery::Medium(m) => inquiry.medium == *m,
            InquiryQuery::Status(s) => inquiry.status == *s,
            InquiryQuery::Phone(p) => inquiry.phone == *p,
            InquiryQuery::Search(term) => {
                let needle = term.trim().to_lowercase();
                let text_hit = inquiry.name.to_lowercase().contains(&needle)
                    || inquiry.city.to_lowercase().contains(&needle)
                    || inquiry
                        .email
                        .as_deref()
                        .map(|e| e.to_lowercase().contains(&needle))
                        .unwrap_or(false);
                text_hit
                    || phone::search_digits(term)
                        .map(|digits| inquiry.phone.contains(&digits))
                        .unwrap_or(false)
            }
            InquiryQuery::CreatedBetween { from, to } => {
                from.map(|f| inquiry.created_at >= f).unwrap_or(true)
                    && to.map(|t| inquiry.created_at <= t).unwrap_or(true)
            }
            InquiryQuery::HasFollowUps => !inquiry.follow_ups.is_empty(),
            InquiryQuery::Not(q) => !q.matches(inquiry),
            InquiryQuery::And(qs) => qs.iter().all(|q| q.matches(inquiry)),
            InquiryQuery::Or(qs) => qs.iter().any(|q| q.matches(inquiry)),
        }
    }

    pub fn to_document(&self) -> Document {
        match self {
            InquiryQuery::All => doc! {},
            InquiryQuery::Department(d) => doc! { "department": d.as_str() },
            InquiryQuery::AssignmentStatus(s) => doc! { "assignmentStatus": s.as_str() },
            InquiryQuery::AssignedTo(id) => doc! { "assignedTo": *id },
            // null also matches a missing field
            InquiryQuery::Unassigned => doc! { "assignedTo": Bson::Null },
            InquiryQuery::ForwardedBy(id) => doc! { "forwardedBy": *id },
            InquiryQuery::CreatedBy(id) => doc! { "createdBy": *id },
            InquiryQuery::Course(c) => doc! { "course": c.as_str() },
            InquiryQuery::PreferredLocation(l) => doc! { "preferredLocation": l.as_str() },
            InquiryQuery::Medium(m) => doc! { "medium": m.as_str() },
            InquiryQuery::Status(s) => doc! { "status": s.as_str() },
            InquiryQuery::Phone(p) => doc! { "phone": p.as_str() },
            InquiryQuery::Search(term) => {
                let pattern = escape_regex(term.trim());
                let mut clauses = vec![
                    doc! { "name": { "$regex": pattern.as_str(), "$options": "i" } },
                    doc! { "email": { "$regex": pattern.as_str(), "$options": "i" } },
                    doc! { "city": { "$regex": pattern.as_str(), "$options": "i" } },
                ];
                if let Some(digits) = phone::search_digits(term) {
                    clauses.push(doc! { "phone": { "$regex": escape_regex(&digits) } });
                }
                doc! { "$or": clauses }
            }
            InquiryQuery::CreatedBetween { from, to } => {
                let mut range = Document::new();
                if let Some(f) = from {
                    range.insert("$gte", timestamp::format(f));
                }
                if let Some(t) = to {
                    range.insert("$lte", timestamp::format(t));
                }
                if range.is_empty() {
                    doc! {}
                } else {
                    doc! { "createdAt": range }
                }
            }
            InquiryQuery::HasFollowUps => doc! { "followUps.0": { "$exists": true } },
            InquiryQuery::Not(q) => doc! { "$nor": [q.to_document()] },
            InquiryQuery::And(qs) => match qs.len() {
                0 => doc! {},
                _ => doc! { "$and": qs.iter().map(|q| q.to_document()).collect::<Vec<_>>() },
            },
            InquiryQuery::Or(qs) => match qs.len() {
                // an empty disjunction selects nothing
                0 => doc! { "_id": { "$exists": false } },
                _ => doc! { "$or": qs.iter().map(|q| q.to_document()).collect::<Vec<_>>() },
            },
        }
    }
}

fn escape_regex(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\.+*?()|[]{}^$#&-~".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Field changes applied to one inquiry in a single write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InquiryUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub education: Option<String>,
    pub course: Option<String>,
    pub preferred_location: Option<String>,
    pub medium: Option<String>,
    pub message: Option<String>,

    pub department: Option<Department>,
    pub assignment_status: Option<AssignmentStatus>,
    /// `Some(None)` clears the owner.
    pub assigned_to: Option<Option<ObjectId>>,
    pub forwarded_by: Option<ObjectId>,
    pub status: Option<LeadStatus>,
    pub pending_first_follow_up: Option<bool>,

    pub push_follow_up: Option<FollowUp>,
    pub replace_follow_up: Option<FollowUp>,
    pub remove_follow_up: Option<ObjectId>,
}

impl InquiryUpdate {
    pub fn is_empty(&self) -> bool {
        *self == InquiryUpdate::default()
    }

    pub fn apply(&self, inquiry: &mut Inquiry, now: DateTime<Utc>) {
        macro_rules! set {
            ($field:ident) => {
                if let Some(ref v) = self.$field {
                    inquiry.$field = v.clone();
                }
            };
        }
        set!(name);
        set!(phone);
        set!(city);
        set!(education);
        set!(course);
        set!(preferred_location);
        set!(medium);
        set!(department);
        set!(assignment_status);
        set!(assigned_to);
        set!(status);
        set!(pending_first_follow_up);
        if let Some(ref email) = self.email {
            inquiry.email = Some(email.clone());
        }
        if let Some(ref message) = self.message {
            inquiry.message = Some(message.clone());
        }
        if let Some(forwarded_by) = self.forwarded_by {
            inquiry.forwarded_by = Some(forwarded_by);
        }
        if let Some(ref follow_up) = self.push_follow_up {
            inquiry.follow_ups.push(follow_up.clone());
        }
        if let Some(ref follow_up) = self.replace_follow_up {
            if let Some(slot) = inquiry.follow_ups.iter_mut().find(|f| f.id == follow_up.id) {
                *slot = follow_up.clone();
            }
        }
        if let Some(id) = self.remove_follow_up {
            inquiry.follow_ups.retain(|f| f.id != id);
        }
        inquiry.updated_at = now;
    }

    /// Extra filter needed to address the follow-up being replaced.
    pub fn follow_up_filter(&self) -> Option<Document> {
        self.replace_follow_up
            .as_ref()
            .map(|f| doc! { "followUps._id": f.id })
    }

    pub fn to_document(&self, now: DateTime<Utc>) -> Result<Document, bson::ser::Error> {
        let mut set = Document::new();
        let mut unset = Document::new();

        let strings = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("email", &self.email),
            ("city", &self.city),
            ("education", &self.education),
            ("course", &self.course),
            ("preferredLocation", &self.preferred_location),
            ("medium", &self.medium),
            ("message", &self.message),
        ];
        for (key, value) in strings {
            if let Some(v) = value {
                set.insert(key, v.clone());
            }
        }
        if let Some(d) = self.department {
            set.insert("department", d.as_str());
        }
        if let Some(s) = self.assignment_status {
            set.insert("assignmentStatus", s.as_str());
        }
        match self.assigned_to {
            Some(Some(owner)) => {
                set.insert("assignedTo", owner);
            }
            Some(None) => {
                unset.insert("assignedTo", "");
            }
            None => {}
        }
        if let Some(f) = self.forwarded_by {
            set.insert("forwardedBy", f);
        }
        if let Some(s) = self.status {
            set.insert("status", s.as_str());
        }
        if let Some(p) = self.pending_first_follow_up {
            set.insert("pendingFirstFollowUp", p);
        }
        if let Some(ref f) = self.replace_follow_up {
            set.insert("followUps.$", bson::to_bson(f)?);
        }
        set.insert("updatedAt", timestamp::format(&now));

        let mut update = doc! { "$set": set };
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }
        if let Some(ref f) = self.push_follow_up {
            update.insert("$push", doc! { "followUps": bson::to_bson(f)? });
        }
        if let Some(id) = self.remove_follow_up {
            update.insert("$pull", doc! { "followUps": { "_id": id } });
        }
        Ok(update)
    }
}
