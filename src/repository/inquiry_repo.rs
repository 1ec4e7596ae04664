use crate::model::inquiry::Inquiry;
use crate::repository::query::{InquiryQuery, InquiryUpdate};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::util::timestamp;
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::stream::StreamExt;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use tracing::{debug, error, info, warn};

#[async_trait]
pub trait InquiryRepository: Send + Sync {
    async fn insert(&self, inquiry: Inquiry) -> RepositoryResult<Inquiry>;
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Inquiry>;
    /// Matching inquiries, newest first.
    async fn find(&self, query: &InquiryQuery) -> RepositoryResult<Vec<Inquiry>>;
    async fn find_one(&self, query: &InquiryQuery) -> RepositoryResult<Option<Inquiry>>;
    /// Applies `update` only while the record still matches `guard`, as one
    /// atomic write. `None` means the record is gone or the guard failed.
    async fn update_where(&self, id: ObjectId, guard: &InquiryQuery, update: InquiryUpdate) -> RepositoryResult<Option<Inquiry>>;
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()>;
}

pub struct MongoInquiryRepository {
    collection: mongodb::Collection<Inquiry>,
}

impl MongoInquiryRepository {
    pub fn new(db: &mongodb::Database, collection_name: &str) -> Self {
        MongoInquiryRepository {
            collection: db.collection::<Inquiry>(collection_name),
        }
    }
}

#[async_trait]
impl InquiryRepository for MongoInquiryRepository {
    #[tracing::instrument(skip(self, inquiry), fields(id = %inquiry.id))]
    async fn insert(&self, inquiry: Inquiry) -> RepositoryResult<Inquiry> {
        info!("Creating new inquiry");
        match self.collection.insert_one(&inquiry, None).await {
            Ok(_) => {
                info!("Inquiry created successfully");
                Ok(inquiry)
            }
            Err(e) => {
                error!("Failed to create inquiry: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn get_by_id(&self, id: ObjectId) -> RepositoryResult<Inquiry> {
        debug!("Fetching inquiry by ID");
        match self.collection.find_one(doc! { "_id": id }, None).await {
            Ok(Some(inquiry)) => Ok(inquiry),
            Ok(None) => {
                warn!("Inquiry not found for ID: {}", id);
                Err(RepositoryError::not_found(format!("Inquiry not found for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to fetch inquiry by ID: {}", e);
                Err(RepositoryError::database(format!("Failed to fetch inquiry by ID: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self, query))]
    async fn find(&self, query: &InquiryQuery) -> RepositoryResult<Vec<Inquiry>> {
        let filter = query.to_document();
        debug!(filter = %filter, "Listing inquiries");
        let options = FindOptions::builder().sort(doc! { "createdAt": -1, "_id": -1 }).build();
        let mut cursor = self.collection.find(filter, options).await.map_err(|e| {
            error!("Failed to list inquiries: {}", e);
            RepositoryError::database(format!("Failed to list inquiries: {}", e))
        })?;
        let mut inquiries = Vec::new();
        while let Some(inquiry) = cursor.next().await {
            match inquiry {
                Ok(i) => inquiries.push(i),
                Err(e) => {
                    error!("Failed to deserialize inquiry: {}", e);
                    return Err(RepositoryError::serialization(format!("Failed to deserialize inquiry: {}", e)));
                }
            }
        }
        debug!("Fetched {} inquiries", inquiries.len());
        Ok(inquiries)
    }

    #[tracing::instrument(skip(self, query))]
    async fn find_one(&self, query: &InquiryQuery) -> RepositoryResult<Option<Inquiry>> {
        let filter = query.to_document();
        debug!(filter = %filter, "Finding one inquiry");
        self.collection.find_one(filter, None).await.map_err(|e| {
            error!("Failed to find inquiry: {}", e);
            RepositoryError::database(format!("Failed to find inquiry: {}", e))
        })
    }

    #[tracing::instrument(skip(self, guard, update), fields(id = %id))]
    async fn update_where(&self, id: ObjectId, guard: &InquiryQuery, update: InquiryUpdate) -> RepositoryResult<Option<Inquiry>> {
        let mut clauses = vec![doc! { "_id": id }, guard.to_document()];
        if let Some(follow_up) = update.follow_up_filter() {
            clauses.push(follow_up);
        }
        let filter = doc! { "$and": clauses };
        let modifications = update.to_document(timestamp::now())?;
        debug!(filter = %filter, update = %modifications, "Conditionally updating inquiry");

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        match self.collection.find_one_and_update(filter, modifications, options).await {
            Ok(Some(updated)) => {
                info!("Inquiry updated successfully");
                Ok(Some(updated))
            }
            Ok(None) => {
                warn!("Inquiry {} did not match the update guard", id);
                Ok(None)
            }
            Err(e) => {
                error!("Failed to update inquiry: {}", e);
                Err(RepositoryError::database(format!("Failed to update inquiry: {}", e)))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ObjectId) -> RepositoryResult<()> {
        info!("Deleting inquiry");
        match self.collection.delete_one(doc! { "_id": id }, None).await {
            Ok(result) if result.deleted_count > 0 => {
                info!("Inquiry deleted successfully");
                Ok(())
            }
            Ok(_) => Err(RepositoryError::not_found(format!("No inquiry found to delete for ID: {}", id))),
            Err(e) => {
                error!("Failed to delete inquiry: {}", e);
                Err(RepositoryError::database(format!("Failed to delete inquiry: {}", e)))
            }
        }
    }
}
