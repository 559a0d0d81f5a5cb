use log::{debug, info};
use sqlx::SqliteConnection;

use crate::db_types::{NewSystemSettings, SystemSettings};

/// The latest settings record, if any. The settings table is append-only; the newest row wins.
pub async fn latest_settings(conn: &mut SqliteConnection) -> Result<Option<SystemSettings>, sqlx::Error> {
    let settings =
        sqlx::query_as("SELECT * FROM system_settings ORDER BY id DESC LIMIT 1").fetch_optional(conn).await?;
    Ok(settings)
}

/// The current settings record, creating the default record first if the table is empty.
pub async fn fetch_or_create_settings(conn: &mut SqliteConnection) -> Result<SystemSettings, sqlx::Error> {
    if let Some(settings) = latest_settings(conn).await? {
        return Ok(settings);
    }
    info!("🗃️ No billing settings found. Creating the default record.");
    insert_settings(NewSystemSettings::default(), conn).await
}

/// Appends a full settings record and returns it. Earlier records are kept for audit.
pub async fn insert_settings(
    settings: NewSystemSettings,
    conn: &mut SqliteConnection,
) -> Result<SystemSettings, sqlx::Error> {
    let settings = sqlx::query_as::<_, SystemSettings>(
        r#"
            INSERT INTO system_settings (
                water_rate_per_cubic_meter,
                minimum_charge,
                penalty_rate,
                billing_cycle,
                billing_day_of_month,
                due_date_days,
                grace_period_days,
                late_fee_method,
                late_fee_fixed_amount,
                late_fee_tier_1_days,
                late_fee_tier_1_amount,
                late_fee_tier_2_days,
                late_fee_tier_2_amount,
                tiered_pricing_enabled,
                tier_1_threshold,
                tier_1_rate,
                tier_2_threshold,
                tier_2_rate,
                tier_3_threshold,
                tier_3_rate,
                meter_reading_frequency,
                meter_reading_day,
                sms_notifications_enabled,
                email_notifications_enabled,
                notification_days_before_due,
                company_name,
                company_address,
                company_phone,
                company_email
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29
            )
            RETURNING *;
        "#,
    )
    .bind(settings.water_rate_per_cubic_meter)
    .bind(settings.minimum_charge)
    .bind(settings.penalty_rate)
    .bind(settings.billing_cycle)
    .bind(settings.billing_day_of_month)
    .bind(settings.due_date_days)
    .bind(settings.grace_period_days)
    .bind(settings.late_fee_method)
    .bind(settings.late_fee_fixed_amount)
    .bind(settings.late_fee_tier_1_days)
    .bind(settings.late_fee_tier_1_amount)
    .bind(settings.late_fee_tier_2_days)
    .bind(settings.late_fee_tier_2_amount)
    .bind(settings.tiered_pricing_enabled)
    .bind(settings.tier_1_threshold)
    .bind(settings.tier_1_rate)
    .bind(settings.tier_2_threshold)
    .bind(settings.tier_2_rate)
    .bind(settings.tier_3_threshold)
    .bind(settings.tier_3_rate)
    .bind(settings.meter_reading_frequency)
    .bind(settings.meter_reading_day)
    .bind(settings.sms_notifications_enabled)
    .bind(settings.email_notifications_enabled)
    .bind(settings.notification_days_before_due)
    .bind(settings.company_name)
    .bind(settings.company_address)
    .bind(settings.company_phone)
    .bind(settings.company_email)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Settings record #{} saved", settings.id);
    Ok(settings)
}
