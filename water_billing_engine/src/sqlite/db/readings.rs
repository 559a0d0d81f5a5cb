use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::db_types::{MeterReading, NewMeterReading, ResourceId};

pub async fn insert_reading(
    reading: NewMeterReading,
    conn: &mut SqliteConnection,
) -> Result<MeterReading, sqlx::Error> {
    let reading_date = reading.reading_date.unwrap_or_else(Utc::now);
    let reading = sqlx::query_as::<_, MeterReading>(
        r#"
            INSERT INTO meter_readings (user_id, reading_value, photo_url, reading_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(reading.user_id)
    .bind(reading.reading_value)
    .bind(reading.photo_url)
    .bind(reading_date)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Reading of {} cu.m for user #{} saved with id {}", reading.reading_value, reading.user_id, reading.id);
    Ok(reading)
}

pub async fn reading_by_id(id: ResourceId, conn: &mut SqliteConnection) -> Result<Option<MeterReading>, sqlx::Error> {
    let reading = sqlx::query_as("SELECT * FROM meter_readings WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(reading)
}

pub async fn readings_for_user(
    user_id: ResourceId,
    conn: &mut SqliteConnection,
) -> Result<Vec<MeterReading>, sqlx::Error> {
    let readings = sqlx::query_as("SELECT * FROM meter_readings WHERE user_id = $1 ORDER BY reading_date DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(readings)
}

/// The most recent reading for the user other than `exclude`, by reading date. `None` for a first reading.
pub async fn previous_reading(
    user_id: ResourceId,
    exclude: ResourceId,
    conn: &mut SqliteConnection,
) -> Result<Option<MeterReading>, sqlx::Error> {
    let reading = sqlx::query_as(
        r#"
            SELECT * FROM meter_readings
            WHERE user_id = $1 AND id <> $2
            ORDER BY reading_date DESC, id DESC
            LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(exclude)
    .fetch_optional(conn)
    .await?;
    Ok(reading)
}

