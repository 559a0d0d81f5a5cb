use chrono::{DateTime, Datelike, TimeZone, Utc};
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{BillStats, Payment, ResourceId},
    traits::BillSettlement,
};

/// The guarded half of a settlement. Inserts the payment row with the bill's **pre-settlement** outstanding
/// amount, and only if the bill has not been settled yet. Returns `None` when the guard does not fire, either
/// because the bill does not exist or because it is already paid; the caller tells those apart.
///
/// This must be the first write of the settlement transaction so that concurrent triggers serialize on it and
/// exactly one payment row can ever exist per bill.
pub async fn insert_settlement_payment(
    settlement: &BillSettlement,
    paid_on: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as::<_, Payment>(
        r#"
            INSERT INTO payments (bill_id, user_id, method, amount, fee, gateway_ref, payment_date)
            SELECT id, user_id, $2, amount_due, $3, $4, $5
            FROM bills
            WHERE id = $1 AND is_paid = 0
            RETURNING *;
        "#,
    )
    .bind(settlement.bill_id)
    .bind(settlement.method)
    .bind(settlement.method.fee())
    .bind(settlement.gateway_ref.as_deref())
    .bind(paid_on)
    .fetch_optional(conn)
    .await?;
    if let Some(p) = &payment {
        debug!("🗃️ Payment #{} of {} recorded against bill #{}", p.id, p.amount, p.bill_id);
    }
    Ok(payment)
}

pub async fn payments_for_user(user_id: ResourceId, conn: &mut SqliteConnection) -> Result<Vec<Payment>, sqlx::Error> {
    let payments = sqlx::query_as("SELECT * FROM payments WHERE user_id = $1 ORDER BY payment_date DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(payments)
}

pub async fn payments_for_bill(bill_id: ResourceId, conn: &mut SqliteConnection) -> Result<Vec<Payment>, sqlx::Error> {
    let payments = sqlx::query_as("SELECT * FROM payments WHERE bill_id = $1 ORDER BY payment_date DESC, id DESC")
        .bind(bill_id)
        .fetch_all(conn)
        .await?;
    Ok(payments)
}

/// Pending/paid bill counts plus revenue (payment amounts, excluding fees) since the start of the current month.
pub async fn bill_stats(conn: &mut SqliteConnection) -> Result<BillStats, sqlx::Error> {
    let now = Utc::now();
    let month_start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now);
    let stats = sqlx::query_as::<_, BillStats>(
        r#"
            SELECT
                (SELECT COUNT(*) FROM bills WHERE is_paid = 0) AS pending_bills,
                (SELECT COUNT(*) FROM bills WHERE is_paid = 1) AS paid_bills,
                (SELECT COALESCE(SUM(amount), 0) FROM payments WHERE payment_date >= $1) AS month_revenue;
        "#,
    )
    .bind(month_start)
    .fetch_one(conn)
    .await?;
    Ok(stats)
}
