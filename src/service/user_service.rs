use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{instrument, warn};

use crate::dto::user_dto::UserSummary;
use crate::model::user::{Actor, Role, User};
use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;

/// Directory lookups over the accounts managed by the identity provider.
#[async_trait]
pub trait UserService: Send + Sync {
    /// The account behind an authenticated request; must exist and be active.
    async fn active_user(&self, id: &ObjectId) -> Result<User, ServiceError>;
    async fn find_user(&self, id: &ObjectId) -> Result<User, ServiceError>;
    async fn list_assignable(&self, actor: &Actor, role: Role) -> Result<Vec<UserSummary>, ServiceError>;
    async fn active_ids_by_role(&self, role: Role) -> Result<Vec<ObjectId>, ServiceError>;
    /// Resolves references for responses; unknown ids get a placeholder.
    async fn summaries(&self, ids: &[ObjectId]) -> Result<HashMap<ObjectId, UserSummary>, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
}

impl UserServiceImpl {
    pub fn new(user_repo: Arc<dyn UserRepository>) -> Self {
        UserServiceImpl { user_repo }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn active_user(&self, id: &ObjectId) -> Result<User, ServiceError> {
        let user = self.find_user(id).await?;
        if !user.is_active {
            warn!("Inactive user {} attempted access", id);
            return Err(ServiceError::AccessDenied("User account is inactive".to_string()));
        }
        Ok(user)
    }

    async fn find_user(&self, id: &ObjectId) -> Result<User, ServiceError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User not found for ID: {}", id)))
    }

    #[instrument(skip(self), fields(actor = %actor.id))]
    async fn list_assignable(&self, actor: &Actor, role: Role) -> Result<Vec<UserSummary>, ServiceError> {
        let allowed = match actor.role {
            Role::Admin => true,
            Role::Presales | Role::Sales => matches!(role, Role::Presales | Role::Sales),
            Role::User => false,
        };
        if !allowed {
            return Err(ServiceError::AccessDenied(format!("Cannot list {} users", role)));
        }
        let users = self.user_repo.find_active_by_role(role).await?;
        Ok(users.iter().map(UserSummary::from).collect())
    }

    async fn active_ids_by_role(&self, role: Role) -> Result<Vec<ObjectId>, ServiceError> {
        Ok(self.user_repo.find_active_by_role(role).await?.into_iter().map(|u| u.id).collect())
    }

    async fn summaries(&self, ids: &[ObjectId]) -> Result<HashMap<ObjectId, UserSummary>, ServiceError> {
        let mut unique = ids.to_vec();
        unique.sort();
        unique.dedup();
        let users = self.user_repo.find_by_ids(&unique).await?;
        let mut out: HashMap<ObjectId, UserSummary> = users.iter().map(|u| (u.id, UserSummary::from(u))).collect();
        for id in unique {
            out.entry(id).or_insert_with(|| UserSummary::unknown(&id));
        }
        Ok(out)
    }
}
