use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewNotification, Notification, ResourceId},
    traits::{AccountApiError, NotificationManagement},
};

/// How many notifications the listing endpoint returns. Older entries stay in the table but are not served.
pub const NOTIFICATION_PAGE_SIZE: i64 = 10;

/// The `NotificationApi` reads a user's notification feed and manages their push device token.
pub struct NotificationApi<B> {
    db: B,
}

impl<B: Debug> Debug for NotificationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotificationApi ({:?})", self.db)
    }
}

impl<B> NotificationApi<B>
where B: NotificationManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// The latest [`NOTIFICATION_PAGE_SIZE`] notifications for a user, newest first.
    pub async fn latest_for_user(&self, user_id: ResourceId) -> Result<Vec<Notification>, AccountApiError> {
        self.db.fetch_latest_notifications(user_id, NOTIFICATION_PAGE_SIZE).await
    }

    /// Stores a notification record.
    pub async fn record(&self, notification: NewNotification) -> Result<Notification, AccountApiError> {
        self.db.insert_notification(notification).await
    }

    /// Registers (or replaces) the push device token for a user.
    pub async fn register_device_token(&self, user_id: ResourceId, token: &str) -> Result<(), AccountApiError> {
        self.db.register_device_token(user_id, token).await?;
        debug!("📱️ Device token registered for user #{user_id}");
        Ok(())
    }

    pub async fn device_token(&self, user_id: ResourceId) -> Result<Option<String>, AccountApiError> {
        self.db.fetch_device_token(user_id).await
    }
}
