//! Turns stored inquiries into response views with user references resolved.

use std::collections::HashMap;

use bson::oid::ObjectId;

use crate::dto::follow_up_dto::FollowUpView;
use crate::dto::inquiry_dto::InquiryView;
use crate::dto::user_dto::UserSummary;
use crate::model::inquiry::Inquiry;
use crate::service::ledger;
use crate::service::user_service::UserService;
use crate::util::error::ServiceError;
use crate::util::timestamp;

fn referenced_users(inquiries: &[Inquiry]) -> Vec<ObjectId> {
    let mut ids = Vec::new();
    for inquiry in inquiries {
        ids.push(inquiry.created_by);
        ids.extend(inquiry.assigned_to);
        ids.extend(inquiry.forwarded_by);
        ids.extend(inquiry.follow_ups.iter().map(|f| f.created_by));
    }
    ids
}

pub async fn populate(users: &dyn UserService, inquiries: &[Inquiry]) -> Result<Vec<InquiryView>, ServiceError> {
    let directory = users.summaries(&referenced_users(inquiries)).await?;
    Ok(inquiries.iter().map(|i| to_view(i, &directory)).collect())
}

pub async fn populate_one(users: &dyn UserService, inquiry: &Inquiry) -> Result<InquiryView, ServiceError> {
    let directory = users.summaries(&referenced_users(std::slice::from_ref(inquiry))).await?;
    Ok(to_view(inquiry, &directory))
}

pub fn summary(directory: &HashMap<ObjectId, UserSummary>, id: &ObjectId) -> UserSummary {
    directory.get(id).cloned().unwrap_or_else(|| UserSummary::unknown(id))
}

pub fn to_view(inquiry: &Inquiry, directory: &HashMap<ObjectId, UserSummary>) -> InquiryView {
    let mut follow_ups = inquiry.follow_ups.clone();
    // stable, so equal timestamps keep append order
    follow_ups.sort_by_key(|f| f.created_at);
    InquiryView {
        id: inquiry.id.to_hex(),
        name: inquiry.name.clone(),
        phone: inquiry.phone.clone(),
        email: inquiry.email.clone(),
        city: inquiry.city.clone(),
        education: inquiry.education.clone(),
        course: inquiry.course.clone(),
        preferred_location: inquiry.preferred_location.clone(),
        medium: inquiry.medium.clone(),
        message: inquiry.message.clone(),
        department: inquiry.department,
        assignment_status: inquiry.assignment_status,
        status: inquiry.status,
        pending_first_follow_up: inquiry.pending_first_follow_up,
        is_admitted: ledger::is_admitted(&inquiry.follow_ups),
        created_by: summary(directory, &inquiry.created_by),
        assigned_to: inquiry.assigned_to.as_ref().map(|id| summary(directory, id)),
        forwarded_by: inquiry.forwarded_by.as_ref().map(|id| summary(directory, id)),
        follow_ups: follow_ups
            .iter()
            .map(|f| FollowUpView::new(f, summary(directory, &f.created_by)))
            .collect(),
        created_at: timestamp::format(&inquiry.created_at),
        updated_at: timestamp::format(&inquiry.updated_at),
    }
}
