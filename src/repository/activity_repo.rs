use crate::model::activity::ActivityEntry;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    async fn record(&self, entry: ActivityEntry) -> RepositoryResult<()>;
}

pub struct MongoActivityRepository {
    collection: mongodb::Collection<ActivityEntry>,
}

impl MongoActivityRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        MongoActivityRepository {
            collection: db.collection::<ActivityEntry>("activities"),
        }
    }
}

#[async_trait]
impl ActivityRepository for MongoActivityRepository {
    async fn record(&self, entry: ActivityEntry) -> RepositoryResult<()> {
        self.collection
            .insert_one(entry, None)
            .await
            .map(|_| ())
            .map_err(|e| RepositoryError::database(format!("Failed to record activity: {}", e)))
    }
}
