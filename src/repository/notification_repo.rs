use crate::model::activity::Notification;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;

/// Outbox of notifications waiting to be delivered.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn insert_many(&self, notifications: Vec<Notification>) -> RepositoryResult<()>;
}

pub struct MongoNotificationRepository {
    collection: mongodb::Collection<Notification>,
}

impl MongoNotificationRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        MongoNotificationRepository {
            collection: db.collection::<Notification>("notifications"),
        }
    }
}

#[async_trait]
impl NotificationRepository for MongoNotificationRepository {
    async fn insert_many(&self, notifications: Vec<Notification>) -> RepositoryResult<()> {
        if notifications.is_empty() {
            return Ok(());
        }
        self.collection
            .insert_many(notifications, None)
            .await
            .map(|_| ())
            .map_err(|e| RepositoryError::database(format!("Failed to queue notifications: {}", e)))
    }
}
