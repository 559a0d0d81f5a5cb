use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Bill, NewBill, ResourceId},
    traits::BillingError,
};

/// Inserts a new bill. At most one bill can exist per meter reading; a duplicate maps to
/// [`BillingError::BillAlreadyExists`].
pub async fn insert_bill(bill: NewBill, conn: &mut SqliteConnection) -> Result<Bill, BillingError> {
    let result = sqlx::query_as::<_, Bill>(
        r#"
            INSERT INTO bills (user_id, reading_id, consumption, amount_due, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(bill.user_id)
    .bind(bill.reading_id)
    .bind(bill.consumption)
    .bind(bill.amount_due)
    .bind(bill.due_date)
    .fetch_one(conn)
    .await;
    match result {
        Ok(bill) => {
            debug!("🗃️ Bill #{} for {} saved against reading #{}", bill.id, bill.amount_due, bill.reading_id);
            Ok(bill)
        },
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(BillingError::BillAlreadyExists(bill.reading_id))
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn bill_by_id(id: ResourceId, conn: &mut SqliteConnection) -> Result<Option<Bill>, sqlx::Error> {
    let bill = sqlx::query_as("SELECT * FROM bills WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(bill)
}

pub async fn bills_for_user(user_id: ResourceId, conn: &mut SqliteConnection) -> Result<Vec<Bill>, sqlx::Error> {
    let bills = sqlx::query_as("SELECT * FROM bills WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await?;
    Ok(bills)
}

/// Marks a bill as settled: `is_paid` set and the outstanding amount zeroed. Callers must have passed the
/// settlement guard first; this update is unconditional.
pub async fn mark_settled(id: ResourceId, conn: &mut SqliteConnection) -> Result<Bill, sqlx::Error> {
    let bill = sqlx::query_as(
        r#"
            UPDATE bills SET is_paid = 1, amount_due = 0, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *;
        "#,
    )
    .bind(id)
    .fetch_one(conn)
    .await?;
    Ok(bill)
}
