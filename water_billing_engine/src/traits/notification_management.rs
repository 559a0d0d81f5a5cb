use crate::{
    db_types::{NewNotification, Notification, ResourceId},
    traits::AccountApiError,
};

/// Storage for the durable half of the notification fan-out: the notification records themselves, and the device
/// tokens push delivery needs. Delivery is someone else's problem.
#[allow(async_fn_in_trait)]
pub trait NotificationManagement {
    /// Stores a notification record. This is the durable leg of a fan-out; errors propagate.
    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification, AccountApiError>;

    /// The most recent notifications for a user, newest first.
    async fn fetch_latest_notifications(
        &self,
        user_id: ResourceId,
        limit: i64,
    ) -> Result<Vec<Notification>, AccountApiError>;

    /// Registers (or replaces) the push device token for a user.
    async fn register_device_token(&self, user_id: ResourceId, token: &str) -> Result<(), AccountApiError>;

    async fn fetch_device_token(&self, user_id: ResourceId) -> Result<Option<String>, AccountApiError>;
}
