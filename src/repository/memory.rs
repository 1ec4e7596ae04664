//! Process-local stores used when `APP_STORE=memory` and by the test suite.
//! Each store keeps its data behind one mutex; no lock is held across an await.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bson::{oid::ObjectId, Document};
use tracing::debug;

use crate::model::activity::{ActivityEntry, Notification};
use crate::model::inquiry::Inquiry;
use crate::model::settings::OptionSettings;
use crate::model::user::{Role, User};
use crate::repository::activity_repo::ActivityRepository;
use crate::repository::inquiry_repo::InquiryRepository;
use crate::repository::notification_repo::NotificationRepository;
use crate::repository::query::{InquiryQuery, InquiryUpdate};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::repository::settings_repo::SettingsRepository;
use crate::repository::user_repo::UserRepository;
use crate::util::timestamp;

#[derive(Default, Clone)]
pub struct InMemoryInquiryRepository {
    // insertion order doubles as the tie-breaker for equal creation times
    data: Arc<Mutex<Vec<Inquiry>>>,
}

impl InMemoryInquiryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Vec<Inquiry>>> {
        self.data.lock().map_err(|_| RepositoryError::poisoned("inquiry"))
    }
}

#[async_trait]
impl InquiryRepository for InMemoryInquiryRepository {
    async fn insert(&self, inquiry: Inquiry) -> RepositoryResult<Inquiry> {
        let mut data = self.lock()?;
        if data.iter().any(|i| i.id == inquiry.id) {
            return Err(RepositoryError::AlreadyExists(format!("Inquiry {} already exists", inquiry.id)));
        }
        data.push(inquiry.clone());
        Ok(inquiry)
    }

    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Inquiry> {
        self.lock()?
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(format!("Inquiry not found for ID: {}", id)))
    }

    async fn find(&self, query: &InquiryQuery) -> RepositoryResult<Vec<Inquiry>> {
        let data = self.lock()?;
        let mut hits: Vec<Inquiry> = data.iter().rev().filter(|i| query.matches(i)).cloned().collect();
        // stable sort keeps newer insertions first on equal timestamps
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!("In-memory find returned {} inquiries", hits.len());
        Ok(hits)
    }

    async fn find_one(&self, query: &InquiryQuery) -> RepositoryResult<Option<Inquiry>> {
        Ok(self.lock()?.iter().find(|i| query.matches(i)).cloned())
    }

    async fn update_where(&self, id: ObjectId, guard: &InquiryQuery, update: InquiryUpdate) -> RepositoryResult<Option<Inquiry>> {
        let mut data = self.lock()?;
        let Some(inquiry) = data.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        if !guard.matches(inquiry) {
            return Ok(None);
        }
        if let Some(ref target) = update.replace_follow_up {
            if inquiry.follow_up(&target.id).is_none() {
                return Ok(None);
            }
        }
        update.apply(inquiry, timestamp::now());
        Ok(Some(inquiry.clone()))
    }

    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        let mut data = self.lock()?;
        let before = data.len();
        data.retain(|i| i.id != id);
        if data.len() == before {
            return Err(RepositoryError::not_found(format!("No inquiry found to delete for ID: {}", id)));
        }
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryUserRepository {
    data: Arc<Mutex<HashMap<ObjectId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, HashMap<ObjectId, User>>> {
        self.data.lock().map_err(|_| RepositoryError::poisoned("user"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> RepositoryResult<User> {
        self.lock()?.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        Ok(self.lock()?.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<User>> {
        let data = self.lock()?;
        Ok(ids.iter().filter_map(|id| data.get(id).cloned()).collect())
    }

    async fn find_active_by_role(&self, role: Role) -> RepositoryResult<Vec<User>> {
        let data = self.lock()?;
        let mut users: Vec<User> = data.values().filter(|u| u.role == role && u.is_active).cloned().collect();
        users.sort_by(|a, b| a.full_name().cmp(&b.full_name()));
        Ok(users)
    }
}

#[derive(Default, Clone)]
pub struct InMemorySettingsRepository {
    data: Arc<Mutex<Option<Document>>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with a raw document, e.g. one in a legacy layout.
    pub fn with_document(document: Document) -> Self {
        InMemorySettingsRepository {
            data: Arc::new(Mutex::new(Some(document))),
        }
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn load_raw(&self) -> RepositoryResult<Option<Document>> {
        Ok(self.data.lock().map_err(|_| RepositoryError::poisoned("settings"))?.clone())
    }

    async fn save(&self, settings: &OptionSettings) -> RepositoryResult<()> {
        let document = bson::to_document(settings)?;
        *self.data.lock().map_err(|_| RepositoryError::poisoned("settings"))? = Some(document);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryActivityRepository {
    data: Arc<Mutex<Vec<ActivityEntry>>>,
}

impl InMemoryActivityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.data.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivityRepository {
    async fn record(&self, entry: ActivityEntry) -> RepositoryResult<()> {
        self.data.lock().map_err(|_| RepositoryError::poisoned("activity"))?.push(entry);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryNotificationRepository {
    data: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.data.lock().map(|d| d.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn insert_many(&self, notifications: Vec<Notification>) -> RepositoryResult<()> {
        self.data
            .lock()
            .map_err(|_| RepositoryError::poisoned("notification"))?
            .extend(notifications);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::inquiry::{AssignmentStatus, Department, LeadStatus};

    fn inquiry(created_at: chrono::DateTime<chrono::Utc>) -> Inquiry {
        Inquiry {
            id: ObjectId::new(),
            name: "Ravi".to_string(),
            phone: "+911234567890".to_string(),
            email: None,
            city: "Pune".to_string(),
            education: "BE".to_string(),
            course: "Data Science".to_string(),
            preferred_location: "Pune".to_string(),
            medium: "Walk-in".to_string(),
            message: None,
            created_by: ObjectId::new(),
            department: Department::Sales,
            assignment_status: AssignmentStatus::NotAssigned,
            assigned_to: None,
            forwarded_by: None,
            status: LeadStatus::Warm,
            pending_first_follow_up: false,
            follow_ups: vec![],
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn test_find_orders_newest_first_with_insertion_tie_break() {
        let repo = InMemoryInquiryRepository::new();
        let t = timestamp::now();
        let older = repo.insert(inquiry(t - chrono::Duration::minutes(1))).await.unwrap();
        let first = repo.insert(inquiry(t)).await.unwrap();
        let second = repo.insert(inquiry(t)).await.unwrap();

        let ids: Vec<ObjectId> = repo.find(&InquiryQuery::All).await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![second.id, first.id, older.id]);
    }

    #[tokio::test]
    async fn test_update_where_respects_guard() {
        let repo = InMemoryInquiryRepository::new();
        let lead = repo.insert(inquiry(timestamp::now())).await.unwrap();
        let owner = ObjectId::new();
        let claim = InquiryUpdate {
            assigned_to: Some(Some(owner)),
            assignment_status: Some(AssignmentStatus::Assigned),
            ..Default::default()
        };

        let applied = repo.update_where(lead.id, &InquiryQuery::Unassigned, claim.clone()).await.unwrap();
        assert_eq!(applied.unwrap().assigned_to, Some(owner));

        let again = repo.update_where(lead.id, &InquiryQuery::Unassigned, claim).await.unwrap();
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = InMemoryInquiryRepository::new();
        assert!(matches!(repo.delete(ObjectId::new()).await, Err(RepositoryError::NotFound(_))));
    }
}
