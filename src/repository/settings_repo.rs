use crate::model::settings::{OptionSettings, SETTINGS_KEY};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, Document};
use mongodb::options::ReplaceOptions;
use tracing::{error, info};

/// Storage of the singleton option catalog document.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// The raw document, so that legacy layouts can be migrated before decoding.
    async fn load_raw(&self) -> RepositoryResult<Option<Document>>;
    async fn save(&self, settings: &OptionSettings) -> RepositoryResult<()>;
}

pub struct MongoSettingsRepository {
    collection: mongodb::Collection<Document>,
}

impl MongoSettingsRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        MongoSettingsRepository {
            collection: db.collection::<Document>("settings"),
        }
    }
}

#[async_trait]
impl SettingsRepository for MongoSettingsRepository {
    async fn load_raw(&self) -> RepositoryResult<Option<Document>> {
        self.collection
            .find_one(doc! { "key": SETTINGS_KEY }, None)
            .await
            .map_err(|e| {
                error!("Failed to load settings: {}", e);
                RepositoryError::database(format!("Failed to load settings: {}", e))
            })
    }

    async fn save(&self, settings: &OptionSettings) -> RepositoryResult<()> {
        let document = bson::to_document(settings)?;
        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection
            .replace_one(doc! { "key": SETTINGS_KEY }, document, options)
            .await
            .map_err(|e| {
                error!("Failed to save settings: {}", e);
                RepositoryError::database(format!("Failed to save settings: {}", e))
            })?;
        info!("Settings saved");
        Ok(())
    }
}
