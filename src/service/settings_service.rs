use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::model::settings::{migrate_legacy_document, OptionSettings};
use crate::model::user::{Actor, Role};
use crate::repository::settings_repo::SettingsRepository;
use crate::util::error::ServiceError;

/// Holds the option catalog. Loaded (and migrated if needed) once at
/// startup, then served from memory; updates write through.
pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
    current: RwLock<OptionSettings>,
}

impl SettingsService {
    pub async fn initialize(repo: Arc<dyn SettingsRepository>) -> Result<Self, ServiceError> {
        let settings = match repo.load_raw().await? {
            None => {
                info!("No option settings found, creating defaults");
                let defaults = OptionSettings::default();
                repo.save(&defaults).await?;
                defaults
            }
            Some(mut raw) => {
                let migrated = migrate_legacy_document(&mut raw);
                let settings: OptionSettings = bson::from_document(raw).map_err(|e| {
                    ServiceError::InternalError(format!("Stored option settings are unreadable: {}", e))
                })?;
                if migrated {
                    warn!("Migrated legacy option settings to the label schema");
                    repo.save(&settings).await?;
                }
                settings
            }
        };
        Ok(SettingsService {
            repo,
            current: RwLock::new(settings),
        })
    }

    pub async fn current(&self) -> OptionSettings {
        self.current.read().await.clone()
    }

    #[instrument(skip(self, settings), fields(actor = %actor.id))]
    pub async fn update(&self, actor: &Actor, mut settings: OptionSettings) -> Result<OptionSettings, ServiceError> {
        if !actor.is(Role::Admin) {
            return Err(ServiceError::AccessDenied("Only admins can change option settings".to_string()));
        }
        settings.key = crate::model::settings::SETTINGS_KEY.to_string();
        settings
            .validate()
            .map_err(|(field, message)| ServiceError::validation(field, message))?;
        let mut current = self.current.write().await;
        self.repo.save(&settings).await?;
        *current = settings.clone();
        info!("Option settings updated");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::settings::{LeadStageOption, OptionItem, SETTINGS_KEY};
    use crate::repository::memory::InMemorySettingsRepository;
    use bson::{doc, oid::ObjectId};

    #[tokio::test]
    async fn test_initialize_creates_defaults() {
        let repo = InMemorySettingsRepository::new();
        let service = SettingsService::initialize(Arc::new(repo.clone())).await.unwrap();
        assert_eq!(service.current().await, OptionSettings::default());
        assert!(repo.load_raw().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_initialize_migrates_legacy_document_once() {
        let repo = InMemorySettingsRepository::with_document(doc! {
            "key": SETTINGS_KEY,
            "courses": [ { "value": "Java" } ],
            "locations": [ { "value": "Nashik" } ],
            "statuses": [ { "value": "hot" } ],
            "leadStages": [],
        });
        let service = SettingsService::initialize(Arc::new(repo.clone())).await.unwrap();
        assert!(service.current().await.has_location("Nashik"));

        let stored = repo.load_raw().await.unwrap().unwrap();
        let course = stored.get_array("courses").unwrap()[0].as_document().unwrap().clone();
        assert_eq!(course, doc! { "label": "Java" });
    }

    #[tokio::test]
    async fn test_update_is_admin_only_and_validated() {
        let service = SettingsService::initialize(Arc::new(InMemorySettingsRepository::new())).await.unwrap();
        let presales = Actor::new(ObjectId::new(), Role::Presales);
        let admin = Actor::new(ObjectId::new(), Role::Admin);

        let mut next = OptionSettings::default();
        next.locations.push(OptionItem::new("Nagpur"));
        assert!(matches!(service.update(&presales, next.clone()).await, Err(ServiceError::AccessDenied(_))));

        service.update(&admin, next).await.unwrap();
        assert!(service.current().await.has_location("Nagpur"));

        let mut broken = OptionSettings::default();
        broken.courses.push(OptionItem::new(" "));
        assert!(matches!(service.update(&admin, broken).await, Err(ServiceError::Validation { .. })));

        let mut unknown_stage = OptionSettings::default();
        unknown_stage.lead_stages.push(LeadStageOption {
            label: "Lost".to_string(),
            sub_stages: vec!["Gone".to_string()],
        });
        match service.update(&admin, unknown_stage).await {
            Err(ServiceError::Validation { field, .. }) => assert_eq!(field, "leadStages"),
            other => panic!("Expected leadStages validation error, got {:?}", other),
        }
        assert!(service.current().await.lead_stage("Lost").is_none());
    }
}
