use crate::model::user::{Role, User};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::options::FindOptions;
use tracing::{debug, error};

/// Read side of the user directory. Accounts are managed by the identity
/// provider; this service only resolves them.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>>;
    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<User>>;
    async fn find_active_by_role(&self, role: Role) -> RepositoryResult<Vec<User>>;
}

pub struct MongoUserRepository {
    collection: mongodb::Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        MongoUserRepository {
            collection: db.collection::<User>("users"),
        }
    }

    async fn collect(&self, filter: bson::Document, options: Option<FindOptions>) -> RepositoryResult<Vec<User>> {
        let mut cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list users: {}", e)))?;
        let mut users = Vec::new();
        while let Some(user) = cursor.next().await {
            match user {
                Ok(u) => users.push(u),
                Err(e) => {
                    error!("Failed to deserialize user: {}", e);
                    return Err(RepositoryError::serialization(format!("Failed to deserialize user: {}", e)));
                }
            }
        }
        Ok(users)
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        let now = crate::util::timestamp::format(&crate::util::timestamp::now());
        user.created_at = Some(now.clone());
        user.updated_at = Some(now);
        match self.collection.insert_one(user.clone(), None).await {
            Ok(_) => Ok(user),
            Err(e) => Err(RepositoryError::database(format!("Failed to insert user: {}", e))),
        }
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        let filter = doc! { "_id": *id };
        self.collection
            .find_one(filter, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find user by id: {}", e)))
    }

    async fn find_by_ids(&self, ids: &[ObjectId]) -> RepositoryResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Resolving {} users", ids.len());
        self.collect(doc! { "_id": { "$in": ids.to_vec() } }, None).await
    }

    async fn find_active_by_role(&self, role: Role) -> RepositoryResult<Vec<User>> {
        let options = FindOptions::builder().sort(doc! { "firstName": 1, "lastName": 1 }).build();
        self.collect(doc! { "role": role.as_str(), "isActive": { "$ne": false } }, Some(options)).await
    }
}
