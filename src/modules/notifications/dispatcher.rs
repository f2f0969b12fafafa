use crate::core::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Notification categories emitted by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewTransaction,
    TransactionFailed,
    TransactionRefunded,
}

/// Entity the notification links back to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedEntity {
    pub entity_type: String,
    pub entity_id: String,
}

/// One notification handed to the external dispatcher
///
/// Delivery mechanics (push, email, in-app) are entirely the dispatcher's
/// concern; the ledger only attempts dispatch after each committed state
/// transition.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub recipient_user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub related_entity: RelatedEntity,
    pub data: serde_json::Value,
}

/// External notification sink
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, event: NotificationEvent) -> Result<()>;
}

/// Dispatcher that only logs, for standalone deployments and tests
#[derive(Debug, Clone, Default)]
pub struct LogDispatcher;

#[async_trait]
impl NotificationDispatcher for LogDispatcher {
    async fn dispatch(&self, event: NotificationEvent) -> Result<()> {
        tracing::info!(
            recipient = %event.recipient_user_id,
            kind = ?event.kind,
            title = %event.title,
            message = %event.message,
            "Notification dispatched"
        );
        Ok(())
    }
}
