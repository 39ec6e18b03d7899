use async_trait::async_trait;
use chama_core::notifications::{NotificationPage, NotificationServiceTrait};
use chama_core::Result;

use crate::client::ApiClient;
use crate::types::CountEnvelope;

#[async_trait]
impl NotificationServiceTrait for ApiClient {
    /// GET /api/notifications?unread={unread_only}&limit={limit}
    async fn get_notifications(&self, unread_only: bool, limit: u32) -> Result<NotificationPage> {
        let path = format!("/api/notifications?unread={}&limit={}", unread_only, limit);
        Ok(self.get(&path, "Failed to fetch notifications").await?)
    }

    /// POST /api/notifications/mark-read/{id}
    async fn mark_as_read(&self, notification_id: i64) -> Result<()> {
        Ok(self
            .post_empty(
                &format!("/api/notifications/mark-read/{}", notification_id),
                "Failed to mark notification as read",
            )
            .await?)
    }

    /// POST /api/notifications/mark-all-read
    async fn mark_all_as_read(&self) -> Result<()> {
        Ok(self
            .post_empty(
                "/api/notifications/mark-all-read",
                "Failed to mark all notifications as read",
            )
            .await?)
    }

    /// GET /api/notifications/unread-count
    async fn get_unread_count(&self) -> Result<u64> {
        let envelope: CountEnvelope = self
            .get(
                "/api/notifications/unread-count",
                "Failed to fetch unread count",
            )
            .await?;
        Ok(envelope.count)
    }
}
