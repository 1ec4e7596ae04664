use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::follow_up_dto::FollowUpRequest;
use crate::dto::inquiry_dto::{
    AdmittedStudent, CreateInquiryRequest, InquiryPage, InquiryView, ListInquiriesQuery, PhoneCheckResponse,
    PhoneMatch, UpdateInquiryRequest,
};
use crate::dto::parse_object_id;
use crate::model::activity::ActivityEntry;
use crate::model::inquiry::{AssignmentStatus, Department, Inquiry};
use crate::model::settings::OptionSettings;
use crate::model::user::{Actor, Role};
use crate::repository::activity_repo::ActivityRepository;
use crate::repository::inquiry_repo::InquiryRepository;
use crate::repository::query::{InquiryQuery, InquiryUpdate};
use crate::service::assignment::{self, Transition};
use crate::service::ledger;
use crate::service::settings_service::SettingsService;
use crate::service::user_service::UserService;
use crate::service::views;
use crate::service::visibility::VisibilityScope;
use crate::util::error::ServiceError;
use crate::util::notifier::{notify_in_background, Notifier};
use crate::util::{phone, timestamp};

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

#[async_trait]
pub trait InquiryService: Send + Sync {
    async fn create_inquiry(&self, actor: &Actor, request: CreateInquiryRequest) -> Result<InquiryView, ServiceError>;
    async fn list_inquiries(&self, actor: &Actor, query: ListInquiriesQuery) -> Result<InquiryPage, ServiceError>;
    async fn get_inquiry(&self, actor: &Actor, id: ObjectId) -> Result<InquiryView, ServiceError>;
    async fn update_inquiry(&self, actor: &Actor, id: ObjectId, request: UpdateInquiryRequest) -> Result<InquiryView, ServiceError>;
    async fn delete_inquiry(&self, actor: &Actor, id: ObjectId) -> Result<(), ServiceError>;

    // Lifecycle
    async fn assign(&self, actor: &Actor, id: ObjectId, target: ObjectId) -> Result<InquiryView, ServiceError>;
    async fn claim(&self, actor: &Actor, id: ObjectId) -> Result<InquiryView, ServiceError>;
    async fn forward_to_sales(&self, actor: &Actor, id: ObjectId) -> Result<InquiryView, ServiceError>;
    async fn reassign_to_presales(&self, actor: &Actor, id: ObjectId, target: ObjectId) -> Result<InquiryView, ServiceError>;
    async fn reassign_to_sales(&self, actor: &Actor, id: ObjectId, target: ObjectId) -> Result<InquiryView, ServiceError>;
    async fn move_to_unattended(&self, actor: &Actor, id: ObjectId) -> Result<InquiryView, ServiceError>;

    // Follow-ups
    async fn add_follow_up(&self, actor: &Actor, id: ObjectId, request: FollowUpRequest) -> Result<InquiryView, ServiceError>;
    async fn update_follow_up(&self, actor: &Actor, id: ObjectId, follow_up_id: ObjectId, request: FollowUpRequest) -> Result<InquiryView, ServiceError>;
    async fn delete_follow_up(&self, actor: &Actor, id: ObjectId, follow_up_id: ObjectId) -> Result<InquiryView, ServiceError>;

    async fn check_phone_exists(&self, actor: &Actor, phone: &str) -> Result<PhoneCheckResponse, ServiceError>;
    async fn list_admitted_students(&self, actor: &Actor) -> Result<Vec<AdmittedStudent>, ServiceError>;
}

pub struct InquiryServiceImpl {
    pub inquiry_repo: Arc<dyn InquiryRepository>,
    pub users: Arc<dyn UserService>,
    pub settings: Arc<SettingsService>,
    pub activity: Arc<dyn ActivityRepository>,
    pub notifier: Arc<dyn Notifier>,
}

impl InquiryServiceImpl {
    pub fn new(
        inquiry_repo: Arc<dyn InquiryRepository>,
        users: Arc<dyn UserService>,
        settings: Arc<SettingsService>,
        activity: Arc<dyn ActivityRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        InquiryServiceImpl {
            inquiry_repo,
            users,
            settings,
            activity,
            notifier,
        }
    }

    fn record_activity(&self, actor: &Actor, action: &str, inquiry_id: ObjectId, detail: Option<String>) {
        let entry = ActivityEntry::new(actor.id, action, inquiry_id, detail);
        let activity = self.activity.clone();
        tokio::spawn(async move {
            if let Err(e) = activity.record(entry).await {
                warn!("Failed to record activity for inquiry {}: {}", inquiry_id, e);
            }
        });
    }

    fn notify(&self, recipients: Vec<ObjectId>, message: String, inquiry_id: ObjectId) {
        notify_in_background(self.notifier.clone(), recipients, message, Some(inquiry_id));
    }

    async fn run(&self, inquiry: &Inquiry, transition: Transition, conflict: &str) -> Result<Inquiry, ServiceError> {
        self.inquiry_repo
            .update_where(inquiry.id, &transition.guard, transition.update)
            .await?
            .ok_or_else(|| {
                warn!("Guarded write on inquiry {} lost a race", inquiry.id);
                ServiceError::Conflict(conflict.to_string())
            })
    }

    async fn view(&self, inquiry: &Inquiry) -> Result<InquiryView, ServiceError> {
        views::populate_one(self.users.as_ref(), inquiry).await
    }

    fn check_catalog(
        settings: &OptionSettings,
        course: Option<&str>,
        location: Option<&str>,
        status: Option<&str>,
    ) -> Result<(), ServiceError> {
        if let Some(course) = course {
            if !settings.has_course(course) {
                return Err(ServiceError::validation("course", format!("'{}' is not a configured course", course)));
            }
        }
        if let Some(location) = location {
            if !settings.has_location(location) {
                return Err(ServiceError::validation(
                    "preferredLocation",
                    format!("'{}' is not a configured location", location),
                ));
            }
        }
        if let Some(status) = status {
            if !settings.has_status(status) {
                return Err(ServiceError::validation("status", format!("'{}' is not a configured status", status)));
            }
        }
        Ok(())
    }

    fn list_predicate(actor: &Actor, query: &ListInquiriesQuery) -> Result<InquiryQuery, ServiceError> {
        let scope = VisibilityScope::for_actor(actor);
        let owner = match query.assigned_to.as_deref().map(str::trim) {
            Some("me") => Some(actor.id),
            Some(owner) => Some(parse_object_id("assignedTo", owner)?),
            None => None,
        };
        let base = match owner {
            Some(owner) if owner == actor.id => scope.mine_predicate(),
            Some(owner) => scope.default_predicate().and(InquiryQuery::AssignedTo(owner)),
            None => scope.default_predicate(),
        };

        let mut parts = vec![base];
        parts.extend(query.department.map(InquiryQuery::Department));
        parts.extend(query.assignment_status.map(InquiryQuery::AssignmentStatus));
        parts.extend(query.course.clone().map(InquiryQuery::Course));
        parts.extend(query.preferred_location.clone().map(InquiryQuery::PreferredLocation));
        parts.extend(query.medium.clone().map(InquiryQuery::Medium));
        parts.extend(query.status.map(InquiryQuery::Status));
        if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            parts.push(InquiryQuery::Search(term.to_string()));
        }
        let from = query.date_from.as_deref().map(|d| parse_bound("dateFrom", d, false)).transpose()?;
        let to = query.date_to.as_deref().map(|d| parse_bound("dateTo", d, true)).transpose()?;
        if from.is_some() || to.is_some() {
            parts.push(InquiryQuery::CreatedBetween { from, to });
        }
        Ok(InquiryQuery::all_of(parts))
    }
}

/// A bare date as an upper bound covers the whole day.
fn parse_bound(field: &str, value: &str, end_of_day: bool) -> Result<DateTime<Utc>, ServiceError> {
    let parsed = timestamp::parse(value.trim())
        .map_err(|_| ServiceError::validation(field, format!("'{}' is not a valid date", value)))?;
    if end_of_day && value.trim().len() == 10 {
        Ok(parsed + Duration::days(1) - Duration::milliseconds(1))
    } else {
        Ok(parsed)
    }
}

fn can_edit(actor: &Actor, inquiry: &Inquiry) -> bool {
    actor.is_any(&[Role::Admin, Role::Presales]) || inquiry.created_by == actor.id || inquiry.is_owned_by(&actor.id)
}

fn can_delete(actor: &Actor, inquiry: &Inquiry) -> bool {
    actor.is_any(&[Role::Admin, Role::Presales]) || inquiry.created_by == actor.id
}

#[async_trait]
impl InquiryService for InquiryServiceImpl {
    #[instrument(skip(self, request), fields(actor = %actor.id, role = %actor.role))]
    async fn create_inquiry(&self, actor: &Actor, mut request: CreateInquiryRequest) -> Result<InquiryView, ServiceError> {
        request.phone = phone::normalize(&request.phone);
        request.validate()?;
        let settings = self.settings.current().await;
        Self::check_catalog(
            &settings,
            Some(request.course.as_str()),
            Some(request.preferred_location.as_str()),
            request.status.as_ref().map(|s| s.as_str()),
        )?;

        let department = if actor.is(Role::Sales) { Department::Sales } else { Department::Presales };
        let now = timestamp::now();
        let inquiry = Inquiry {
            id: ObjectId::new(),
            name: request.name.trim().to_string(),
            phone: request.phone,
            email: request.email.map(|e| e.trim().to_lowercase()),
            city: request.city.trim().to_string(),
            education: request.education,
            course: request.course,
            preferred_location: request.preferred_location,
            medium: request.medium,
            message: request.message,
            created_by: actor.id,
            department,
            assignment_status: AssignmentStatus::NotAssigned,
            assigned_to: None,
            forwarded_by: None,
            status: request.status.unwrap_or_default(),
            pending_first_follow_up: false,
            follow_ups: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let inserted = self.inquiry_repo.insert(inquiry).await?;
        info!("Inquiry {} created in {}", inserted.id, department);
        self.record_activity(actor, "inquiry_created", inserted.id, None);
        self.view(&inserted).await
    }

    #[instrument(skip(self, query), fields(actor = %actor.id, role = %actor.role))]
    async fn list_inquiries(&self, actor: &Actor, query: ListInquiriesQuery) -> Result<InquiryPage, ServiceError> {
        let predicate = Self::list_predicate(actor, &query)?;
        let mut inquiries = self.inquiry_repo.find(&predicate).await?;
        if query.include_admitted != Some(true) {
            inquiries.retain(|i| !ledger::is_admitted(&i.follow_ups));
        }
        let total = inquiries.len() as u64;

        if query.page.is_none() && query.limit.is_none() {
            let views = views::populate(self.users.as_ref(), &inquiries).await?;
            return Ok(InquiryPage {
                inquiries: views,
                total,
                page: None,
                limit: None,
                total_pages: None,
            });
        }

        let page = query.page.unwrap_or(1).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let window: Vec<Inquiry> = inquiries
            .into_iter()
            .skip(((page - 1) as usize) * limit as usize)
            .take(limit as usize)
            .collect();
        let views = views::populate(self.users.as_ref(), &window).await?;
        Ok(InquiryPage {
            inquiries: views,
            total,
            page: Some(page),
            limit: Some(limit),
            total_pages: Some(total.div_ceil(limit as u64)),
        })
    }

    #[instrument(skip(self), fields(actor = %actor.id, inquiry = %id))]
    async fn get_inquiry(&self, actor: &Actor, id: ObjectId) -> Result<InquiryView, ServiceError> {
        let inquiry = self.inquiry_repo.get_by_id(id).await?;
        if !VisibilityScope::for_actor(actor).can_view(&inquiry) {
            return Err(ServiceError::AccessDenied("You do not have access to this inquiry".to_string()));
        }
        self.view(&inquiry).await
    }

    #[instrument(skip(self, request), fields(actor = %actor.id, inquiry = %id))]
    async fn update_inquiry(&self, actor: &Actor, id: ObjectId, mut request: UpdateInquiryRequest) -> Result<InquiryView, ServiceError> {
        let inquiry = self.inquiry_repo.get_by_id(id).await?;
        if !can_edit(actor, &inquiry) {
            return Err(ServiceError::AccessDenied("Only admin, presales, the creator or the owner can edit this inquiry".to_string()));
        }
        request.phone = request.phone.as_deref().map(phone::normalize);
        request.validate()?;
        let settings = self.settings.current().await;
        Self::check_catalog(
            &settings,
            request.course.as_deref(),
            request.preferred_location.as_deref(),
            request.status.as_ref().map(|s| s.as_str()),
        )?;

        let update = InquiryUpdate {
            name: request.name.map(|n| n.trim().to_string()),
            phone: request.phone,
            email: request.email.map(|e| e.trim().to_lowercase()),
            city: request.city,
            education: request.education,
            course: request.course,
            preferred_location: request.preferred_location,
            medium: request.medium,
            message: request.message,
            status: request.status,
            ..Default::default()
        };
        if update.is_empty() {
            return self.view(&inquiry).await;
        }
        let updated = self
            .inquiry_repo
            .update_where(id, &InquiryQuery::All, update)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inquiry not found for ID: {}", id)))?;
        self.record_activity(actor, "inquiry_updated", id, None);
        self.view(&updated).await
    }

    #[instrument(skip(self), fields(actor = %actor.id, inquiry = %id))]
    async fn delete_inquiry(&self, actor: &Actor, id: ObjectId) -> Result<(), ServiceError> {
        let inquiry = self.inquiry_repo.get_by_id(id).await?;
        if !can_delete(actor, &inquiry) {
            return Err(ServiceError::AccessDenied("Only admin, presales or the creator can delete this inquiry".to_string()));
        }
        self.inquiry_repo.delete(id).await?;
        info!("Inquiry {} deleted", id);
        self.record_activity(actor, "inquiry_deleted", id, None);
        Ok(())
    }

    #[instrument(skip(self), fields(actor = %actor.id, inquiry = %id, target = %target))]
    async fn assign(&self, actor: &Actor, id: ObjectId, target: ObjectId) -> Result<InquiryView, ServiceError> {
        assignment::ensure_can_assign(actor)?;
        let inquiry = self.inquiry_repo.get_by_id(id).await?;
        let target_user = self.users.find_user(&target).await?;
        let transition = assignment::assign(actor, &inquiry, &target_user)?;
        let updated = self.run(&inquiry, transition, "Inquiry changed while assigning, retry").await?;
        self.notify(vec![target], format!("Inquiry '{}' has been assigned to you", updated.name), id);
        self.record_activity(actor, "inquiry_assigned", id, Some(target.to_hex()));
        self.view(&updated).await
    }

    #[instrument(skip(self), fields(actor = %actor.id, inquiry = %id))]
    async fn claim(&self, actor: &Actor, id: ObjectId) -> Result<InquiryView, ServiceError> {
        let inquiry = self.inquiry_repo.get_by_id(id).await?;
        let transition = assignment::claim(actor, &inquiry)?;
        let updated = self.run(&inquiry, transition, "Inquiry is already assigned").await?;
        info!("Inquiry {} claimed", id);
        self.notify(vec![actor.id], format!("You claimed inquiry '{}'", updated.name), id);
        self.record_activity(actor, "inquiry_claimed", id, None);
        self.view(&updated).await
    }

    #[instrument(skip(self), fields(actor = %actor.id, inquiry = %id))]
    async fn forward_to_sales(&self, actor: &Actor, id: ObjectId) -> Result<InquiryView, ServiceError> {
        let inquiry = self.inquiry_repo.get_by_id(id).await?;
        let transition = assignment::forward_to_sales(actor, &inquiry)?;
        let updated = self.run(&inquiry, transition, "Inquiry changed while forwarding, retry").await?;
        info!("Inquiry {} forwarded to sales", id);

        let users = self.users.clone();
        let notifier = self.notifier.clone();
        let message = format!("New inquiry '{}' is waiting in the sales pool", updated.name);
        tokio::spawn(async move {
            match users.active_ids_by_role(Role::Sales).await {
                Ok(recipients) => notify_in_background(notifier, recipients, message, Some(id)),
                Err(e) => warn!("Could not resolve sales users to notify: {}", e),
            }
        });
        self.record_activity(actor, "inquiry_forwarded", id, None);
        self.view(&updated).await
    }

    #[instrument(skip(self), fields(actor = %actor.id, inquiry = %id, target = %target))]
    async fn reassign_to_presales(&self, actor: &Actor, id: ObjectId, target: ObjectId) -> Result<InquiryView, ServiceError> {
        let inquiry = self.inquiry_repo.get_by_id(id).await?;
        let target_user = self.users.find_user(&target).await?;
        let transition = assignment::reassign(actor, &inquiry, Department::Presales, &target_user)?;
        let updated = self.run(&inquiry, transition, "Inquiry changed while reassigning, retry").await?;
        self.notify(vec![target], format!("Inquiry '{}' has been reassigned to you", updated.name), id);
        self.record_activity(actor, "inquiry_reassigned", id, Some(target.to_hex()));
        self.view(&updated).await
    }

    #[instrument(skip(self), fields(actor = %actor.id, inquiry = %id, target = %target))]
    async fn reassign_to_sales(&self, actor: &Actor, id: ObjectId, target: ObjectId) -> Result<InquiryView, ServiceError> {
        let inquiry = self.inquiry_repo.get_by_id(id).await?;
        let target_user = self.users.find_user(&target).await?;
        let transition = assignment::reassign(actor, &inquiry, Department::Sales, &target_user)?;
        let updated = self.run(&inquiry, transition, "Inquiry changed while reassigning, retry").await?;
        self.notify(vec![target], format!("Inquiry '{}' has been reassigned to you", updated.name), id);
        self.record_activity(actor, "inquiry_reassigned", id, Some(target.to_hex()));
        self.view(&updated).await
    }

    #[instrument(skip(self), fields(actor = %actor.id, inquiry = %id))]
    async fn move_to_unattended(&self, actor: &Actor, id: ObjectId) -> Result<InquiryView, ServiceError> {
        let inquiry = self.inquiry_repo.get_by_id(id).await?;
        let transition = assignment::move_to_unattended(actor, &inquiry)?;
        let updated = self.run(&inquiry, transition, "Inquiry changed while releasing, retry").await?;
        self.record_activity(actor, "inquiry_unattended", id, None);
        self.view(&updated).await
    }

    #[instrument(skip(self, request), fields(actor = %actor.id, inquiry = %id))]
    async fn add_follow_up(&self, actor: &Actor, id: ObjectId, request: FollowUpRequest) -> Result<InquiryView, ServiceError> {
        let inquiry = self.inquiry_repo.get_by_id(id).await?;
        if !ledger::can_add(actor, &inquiry) {
            return Err(ServiceError::AccessDenied("You cannot add follow-ups to this inquiry".to_string()));
        }
        request.validate()?;
        ledger::validate_against_catalog(&request, &self.settings.current().await)?;

        let follow_up = ledger::build(actor, &request, timestamp::now());
        let update = InquiryUpdate {
            status: ledger::derive_status(inquiry.department, &request),
            pending_first_follow_up: (inquiry.pending_first_follow_up && inquiry.is_owned_by(&actor.id)).then_some(false),
            push_follow_up: Some(follow_up),
            ..Default::default()
        };
        let updated = self
            .inquiry_repo
            .update_where(id, &InquiryQuery::All, update)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inquiry not found for ID: {}", id)))?;
        self.record_activity(actor, "follow_up_added", id, None);
        self.view(&updated).await
    }

    #[instrument(skip(self, request), fields(actor = %actor.id, inquiry = %id, follow_up = %follow_up_id))]
    async fn update_follow_up(&self, actor: &Actor, id: ObjectId, follow_up_id: ObjectId, request: FollowUpRequest) -> Result<InquiryView, ServiceError> {
        let inquiry = self.inquiry_repo.get_by_id(id).await?;
        let existing = inquiry
            .follow_up(&follow_up_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Follow-up not found for ID: {}", follow_up_id)))?;
        if !ledger::can_update(actor, &inquiry, existing) {
            return Err(ServiceError::AccessDenied("You cannot edit this follow-up".to_string()));
        }
        request.validate()?;
        if request.lead_stage.is_some() || request.sub_stage.is_some() {
            let effective = FollowUpRequest {
                lead_stage: request.lead_stage.or(existing.lead_stage),
                sub_stage: request.sub_stage.clone().or_else(|| existing.sub_stage.clone()),
                ..Default::default()
            };
            ledger::validate_against_catalog(&effective, &self.settings.current().await)?;
        }

        let update = InquiryUpdate {
            status: ledger::derive_status(inquiry.department, &request),
            replace_follow_up: Some(ledger::merge(existing, &request, timestamp::now())),
            ..Default::default()
        };
        let updated = self
            .inquiry_repo
            .update_where(id, &InquiryQuery::All, update)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Follow-up not found for ID: {}", follow_up_id)))?;
        self.record_activity(actor, "follow_up_updated", id, Some(follow_up_id.to_hex()));
        self.view(&updated).await
    }

    #[instrument(skip(self), fields(actor = %actor.id, inquiry = %id, follow_up = %follow_up_id))]
    async fn delete_follow_up(&self, actor: &Actor, id: ObjectId, follow_up_id: ObjectId) -> Result<InquiryView, ServiceError> {
        let inquiry = self.inquiry_repo.get_by_id(id).await?;
        let existing = inquiry
            .follow_up(&follow_up_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Follow-up not found for ID: {}", follow_up_id)))?;
        if !ledger::can_delete(actor, existing) {
            return Err(ServiceError::AccessDenied("Only admin, presales or the author can delete a follow-up".to_string()));
        }
        let update = InquiryUpdate {
            remove_follow_up: Some(follow_up_id),
            ..Default::default()
        };
        let updated = self
            .inquiry_repo
            .update_where(id, &InquiryQuery::All, update)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Inquiry not found for ID: {}", id)))?;
        self.record_activity(actor, "follow_up_deleted", id, Some(follow_up_id.to_hex()));
        self.view(&updated).await
    }

    #[instrument(skip(self, phone_number), fields(actor = %actor.id))]
    async fn check_phone_exists(&self, actor: &Actor, phone_number: &str) -> Result<PhoneCheckResponse, ServiceError> {
        let normalized = phone::normalize(phone_number);
        if !phone::is_lookup_phone(&normalized) {
            return Err(ServiceError::validation("phone", "phone must be '+' followed by at least 10 digits"));
        }
        let scope = VisibilityScope::for_actor(actor);
        let query = InquiryQuery::Phone(normalized).and(scope.department_predicate());
        let Some(found) = self.inquiry_repo.find_one(&query).await? else {
            return Ok(PhoneCheckResponse { exists: false, inquiry: None });
        };
        let assigned_to = match found.assigned_to {
            Some(owner) => {
                let directory = self.users.summaries(&[owner]).await?;
                Some(views::summary(&directory, &owner))
            }
            None => None,
        };
        Ok(PhoneCheckResponse {
            exists: true,
            inquiry: Some(PhoneMatch {
                id: found.id.to_hex(),
                name: found.name,
                department: found.department,
                assignment_status: found.assignment_status,
                assigned_to,
                created_at: timestamp::format(&found.created_at),
            }),
        })
    }

    #[instrument(skip(self), fields(actor = %actor.id))]
    async fn list_admitted_students(&self, actor: &Actor) -> Result<Vec<AdmittedStudent>, ServiceError> {
        if actor.is(Role::User) {
            return Err(ServiceError::AccessDenied("Admitted students are not visible to this role".to_string()));
        }
        let mut admitted: Vec<(Inquiry, DateTime<Utc>)> = self
            .inquiry_repo
            .find(&InquiryQuery::HasFollowUps)
            .await?
            .into_iter()
            .filter(|i| ledger::is_admitted(&i.follow_ups))
            .filter_map(|i| ledger::admission_date(&i.follow_ups).map(|date| (i, date)))
            .collect();
        admitted.sort_by(|a, b| b.1.cmp(&a.1));

        let inquiries: Vec<Inquiry> = admitted.iter().map(|(i, _)| i.clone()).collect();
        let views = views::populate(self.users.as_ref(), &inquiries).await?;
        Ok(views
            .into_iter()
            .zip(admitted.iter())
            .map(|(inquiry, (_, date))| AdmittedStudent {
                inquiry,
                admission_date: timestamp::format(date),
            })
            .collect())
    }
}
