use crate::errors::Result;
use crate::notifications::notifications_model::NotificationPage;
use async_trait::async_trait;

/// Trait for the notifications resource.
#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    async fn get_notifications(&self, unread_only: bool, limit: u32) -> Result<NotificationPage>;
    async fn mark_as_read(&self, notification_id: i64) -> Result<()>;
    async fn mark_all_as_read(&self) -> Result<()>;
    async fn get_unread_count(&self) -> Result<u64>;
}
