use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::dto::dashboard_dto::{DashboardStats, LocationCount, UnattendedCounts};
use crate::model::inquiry::{Department, Inquiry, LeadStatus};
use crate::model::user::{Actor, Role};
use crate::repository::inquiry_repo::InquiryRepository;
use crate::repository::query::InquiryQuery;
use crate::service::ledger;
use crate::service::settings_service::SettingsService;
use crate::service::user_service::UserService;
use crate::service::views;
use crate::service::visibility::VisibilityScope;
use crate::util::error::ServiceError;

const RECENT_LIMIT: usize = 5;

#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn get_dashboard_stats(&self, actor: &Actor) -> Result<DashboardStats, ServiceError>;
    async fn get_unattended_counts(&self, actor: &Actor) -> Result<UnattendedCounts, ServiceError>;
}

pub struct DashboardServiceImpl {
    pub inquiry_repo: Arc<dyn InquiryRepository>,
    pub users: Arc<dyn UserService>,
    pub settings: Arc<SettingsService>,
}

impl DashboardServiceImpl {
    pub fn new(inquiry_repo: Arc<dyn InquiryRepository>, users: Arc<dyn UserService>, settings: Arc<SettingsService>) -> Self {
        DashboardServiceImpl {
            inquiry_repo,
            users,
            settings,
        }
    }

    /// Matching inquiries that are still in the pipeline, newest first.
    async fn active(&self, query: &InquiryQuery) -> Result<Vec<Inquiry>, ServiceError> {
        let mut inquiries = self.inquiry_repo.find(query).await?;
        inquiries.retain(|i| !ledger::is_admitted(&i.follow_ups));
        Ok(inquiries)
    }
}

fn count_where(inquiries: &[Inquiry], predicate: impl Fn(&Inquiry) -> bool) -> u64 {
    inquiries.iter().filter(|i| predicate(i)).count() as u64
}

#[async_trait]
impl DashboardService for DashboardServiceImpl {
    #[instrument(skip(self), fields(actor = %actor.id, role = %actor.role))]
    async fn get_dashboard_stats(&self, actor: &Actor) -> Result<DashboardStats, ServiceError> {
        let scope = VisibilityScope::for_actor(actor);
        let attended = match actor.role {
            Role::User => scope.mine_predicate(),
            _ => InquiryQuery::Or(vec![InquiryQuery::AssignedTo(actor.id), InquiryQuery::ForwardedBy(actor.id)]),
        };

        let base = self.active(&scope.default_predicate()).await?;
        let mine = self.active(&InquiryQuery::CreatedBy(actor.id)).await?;
        let attended = self.active(&attended).await?;
        let admitted = count_where(
            &self.inquiry_repo.find(&InquiryQuery::HasFollowUps).await?,
            |i| ledger::is_admitted(&i.follow_ups),
        );
        debug!("Dashboard base set has {} active inquiries", base.len());

        let recent: Vec<Inquiry> = base.iter().take(RECENT_LIMIT).cloned().collect();
        Ok(DashboardStats {
            total_inquiries: base.len() as u64,
            hot_inquiries: count_where(&base, |i| i.status == LeadStatus::Hot),
            warm_inquiries: count_where(&base, |i| i.status == LeadStatus::Warm),
            cold_inquiries: count_where(&base, |i| i.status == LeadStatus::Cold),
            presales_inquiries: count_where(&base, |i| i.department == Department::Presales),
            sales_inquiries: count_where(&base, |i| i.department == Department::Sales),
            my_inquiries: mine.len() as u64,
            my_attended_inquiries: attended.len() as u64,
            unassigned_inquiries: count_where(&base, |i| i.assigned_to.is_none()),
            admitted_students: admitted,
            recent_inquiries: views::populate(self.users.as_ref(), &recent).await?,
        })
    }

    #[instrument(skip(self), fields(actor = %actor.id, role = %actor.role))]
    async fn get_unattended_counts(&self, actor: &Actor) -> Result<UnattendedCounts, ServiceError> {
        if actor.is(Role::User) {
            return Err(ServiceError::AccessDenied("Unattended counts are not available to this role".to_string()));
        }
        let scope = VisibilityScope::for_actor(actor);
        let pool = self
            .active(&InquiryQuery::Unassigned.and(scope.department_predicate()))
            .await?;
        let settings = self.settings.current().await;
        let by_location = settings
            .locations
            .iter()
            .map(|location| LocationCount {
                location: location.label.clone(),
                count: count_where(&pool, |i| i.preferred_location == location.label),
            })
            .collect();
        Ok(UnattendedCounts {
            total: pool.len() as u64,
            by_location,
        })
    }
}
