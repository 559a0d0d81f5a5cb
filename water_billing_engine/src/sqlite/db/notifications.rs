use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{NewNotification, Notification, ResourceId};

pub async fn insert_notification(
    notification: NewNotification,
    conn: &mut SqliteConnection,
) -> Result<Notification, sqlx::Error> {
    let notification = sqlx::query_as::<_, Notification>(
        r#"
            INSERT INTO notifications (user_id, title, message)
            VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(notification.user_id)
    .bind(notification.title)
    .bind(notification.message)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Notification #{} stored for user #{}", notification.id, notification.user_id);
    Ok(notification)
}

pub async fn latest_notifications(
    user_id: ResourceId,
    limit: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Notification>, sqlx::Error> {
    let notifications =
        sqlx::query_as("SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2")
            .bind(user_id)
            .bind(limit)
            .fetch_all(conn)
            .await?;
    Ok(notifications)
}
