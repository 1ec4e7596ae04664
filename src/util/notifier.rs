use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{debug, warn};

use crate::model::activity::Notification;
use crate::repository::notification_repo::NotificationRepository;
use crate::repository::repository_error::RepositoryResult;
use crate::util::timestamp;

/// Sink for user-facing notifications. Callers treat delivery as best effort.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, recipients: &[ObjectId], message: &str, inquiry_id: Option<ObjectId>) -> RepositoryResult<()>;
}

/// Queues notifications in the in-app outbox.
pub struct InAppNotifier {
    outbox: Arc<dyn NotificationRepository>,
}

impl InAppNotifier {
    pub fn new(outbox: Arc<dyn NotificationRepository>) -> Self {
        InAppNotifier { outbox }
    }
}

#[async_trait]
impl Notifier for InAppNotifier {
    async fn notify(&self, recipients: &[ObjectId], message: &str, inquiry_id: Option<ObjectId>) -> RepositoryResult<()> {
        if recipients.is_empty() {
            debug!("No recipients for notification: {}", message);
            return Ok(());
        }
        let created_at = timestamp::now();
        let batch = recipients
            .iter()
            .map(|recipient| Notification {
                id: ObjectId::new(),
                recipient: *recipient,
                message: message.to_string(),
                inquiry_id,
                read: false,
                created_at,
            })
            .collect();
        self.outbox.insert_many(batch).await
    }
}

/// Fires a notification without waiting for it. Failures are logged only.
pub fn notify_in_background(notifier: Arc<dyn Notifier>, recipients: Vec<ObjectId>, message: String, inquiry_id: Option<ObjectId>) {
    tokio::spawn(async move {
        if let Err(e) = notifier.notify(&recipients, &message, inquiry_id).await {
            warn!("Failed to send notification '{}': {}", message, e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::InMemoryNotificationRepository;

    #[tokio::test]
    async fn test_one_outbox_entry_per_recipient() {
        let outbox = InMemoryNotificationRepository::new();
        let notifier = InAppNotifier::new(Arc::new(outbox.clone()));
        let recipients = [ObjectId::new(), ObjectId::new()];

        notifier.notify(&recipients, "New lead in the sales pool", None).await.unwrap();

        let queued = outbox.notifications();
        assert_eq!(queued.len(), 2);
        assert!(queued.iter().all(|n| !n.read && n.message == "New lead in the sales pool"));
    }
}
