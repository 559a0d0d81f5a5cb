//! `SqliteDatabase` is a concrete implementation of a water billing engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use chrono::Utc;
use log::*;
use sqlx::SqlitePool;
use wbs_common::Centavos;

use super::db::{bills, db_url, issues, new_pool, notifications, payments, readings, settings, users};
use crate::{
    billing::{calculate_bill, RateSheet},
    db_types::{
        Bill,
        BillStats,
        Issue,
        IssueUpdate,
        MeterReading,
        NewBill,
        NewIssue,
        NewMeterReading,
        NewNotification,
        NewSystemSettings,
        NewUser,
        Notification,
        Payment,
        ResourceId,
        SystemSettings,
        User,
        UserCredentials,
    },
    query_objects::UserQueryFilter,
    traits::{
        AccountApiError,
        AccountManagement,
        AuthApiError,
        AuthManagement,
        BillSettlement,
        BillingDatabase,
        BillingError,
        IssueTracking,
        NotificationManagement,
        SettingsManagement,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl BillingDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Takes a new meter reading, and in a single atomic transaction,
    /// * stores the reading,
    /// * prices the consumption against the most recent prior reading (zero for a first reading),
    /// * stores the resulting bill, due `due_date_days` after the reading date,
    /// * stores the consumer's "new bill" notification.
    /// Returns the stored reading and its bill.
    async fn process_new_reading(
        &self,
        reading: NewMeterReading,
        settings: &SystemSettings,
    ) -> Result<(MeterReading, Bill), BillingError> {
        let mut tx = self.pool.begin().await?;
        let user = users::user_by_id(reading.user_id, &mut tx)
            .await?
            .ok_or(BillingError::UserNotFound(reading.user_id))?;
        let reading = readings::insert_reading(reading, &mut tx).await?;
        let meter = user.meter_number.as_deref().unwrap_or("unassigned");
        debug!("🗃️ Reading #{} for meter {meter} has been saved in the DB", reading.id);
        let bill = issue_bill_for_reading(&reading, settings, &mut tx).await?;
        let message = format!(
            "Your new water bill of {} is due on {}.",
            bill.amount_due,
            bill.due_date.format("%d %b %Y")
        );
        notifications::insert_notification(NewNotification::new(user.id, "New water bill", message), &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Reading #{} processed. Bill #{} issued for {}", reading.id, bill.id, bill.amount_due);
        Ok((reading, bill))
    }

    async fn create_bill_for_reading(
        &self,
        reading_id: ResourceId,
        settings: &SystemSettings,
    ) -> Result<Bill, BillingError> {
        let mut tx = self.pool.begin().await?;
        let reading = readings::reading_by_id(reading_id, &mut tx)
            .await?
            .ok_or(BillingError::ReadingNotFound(reading_id))?;
        let bill = issue_bill_for_reading(&reading, settings, &mut tx).await?;
        let message = format!(
            "Your new water bill of {} is due on {}.",
            bill.amount_due,
            bill.due_date.format("%d %b %Y")
        );
        notifications::insert_notification(NewNotification::new(bill.user_id, "New water bill", message), &mut tx)
            .await?;
        tx.commit().await?;
        Ok(bill)
    }

    /// Settles a bill, and in a single atomic transaction,
    /// * records the payment for the bill's outstanding amount plus the method's convenience fee. This is the
    ///   guarded write: it only succeeds while the bill is unpaid, so whichever settlement trigger lands second
    ///   finds nothing to do and the transaction rolls back,
    /// * marks the bill as paid and zeroes the outstanding amount,
    /// * stores the consumer's "payment received" notification.
    /// Returns the settled bill and the payment record.
    async fn settle_bill(&self, settlement: BillSettlement) -> Result<(Bill, Payment), BillingError> {
        let mut tx = self.pool.begin().await?;
        let paid_on = settlement.paid_on.unwrap_or_else(Utc::now);
        let payment = match payments::insert_settlement_payment(&settlement, paid_on, &mut tx).await? {
            Some(payment) => payment,
            None => {
                // The guard did not fire. Look at the bill to find out why.
                return match bills::bill_by_id(settlement.bill_id, &mut tx).await? {
                    Some(bill) => {
                        info!("🗃️ Bill #{} is already settled. Not recording a second payment", bill.id);
                        Err(BillingError::BillAlreadySettled(bill.id))
                    },
                    None => Err(BillingError::BillNotFound(settlement.bill_id)),
                };
            },
        };
        let bill = bills::mark_settled(settlement.bill_id, &mut tx).await?;
        let message = format!(
            "We received your payment of {} for bill #{} via {}. Thank you!",
            payment.amount, bill.id, payment.method
        );
        notifications::insert_notification(NewNotification::new(bill.user_id, "Payment received", message), &mut tx)
            .await?;
        tx.commit().await?;
        debug!("🗃️ Bill #{} settled. Payment #{} of {} recorded", bill.id, payment.id, payment.amount);
        Ok((bill, payment))
    }
}

/// Prices `reading` against the user's previous reading and stores the bill. Shared by both billing flows;
/// runs inside the caller's transaction.
async fn issue_bill_for_reading(
    reading: &MeterReading,
    settings: &SystemSettings,
    conn: &mut sqlx::SqliteConnection,
) -> Result<Bill, BillingError> {
    let previous = readings::previous_reading(reading.user_id, reading.id, conn)
        .await?
        .map(|r| r.reading_value)
        .unwrap_or_default();
    let rates = RateSheet::from(settings);
    let totals = calculate_bill(reading.reading_value, previous, Centavos::from(0), reading.reading_date, &rates)?;
    let new_bill = NewBill {
        user_id: reading.user_id,
        reading_id: reading.id,
        consumption: totals.consumption,
        amount_due: totals.amount_due,
        due_date: totals.due_date,
    };
    let bill = bills::insert_bill(new_bill, conn).await?;
    Ok(bill)
}

impl AccountManagement for SqliteDatabase {
    async fn fetch_user_by_id(&self, id: ResourceId) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::user_by_id(id, &mut conn).await?;
        Ok(user)
    }

    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let user = users::user_by_username(username, &mut conn).await?;
        Ok(user)
    }

    async fn search_users(&self, query: UserQueryFilter) -> Result<Vec<User>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let users = users::search_users(query, &mut conn).await?;
        Ok(users)
    }

    async fn fetch_readings_for_user(&self, user_id: ResourceId) -> Result<Vec<MeterReading>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let readings = readings::readings_for_user(user_id, &mut conn).await?;
        Ok(readings)
    }

    async fn fetch_reading_by_id(&self, id: ResourceId) -> Result<Option<MeterReading>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let reading = readings::reading_by_id(id, &mut conn).await?;
        Ok(reading)
    }

    async fn fetch_bills_for_user(&self, user_id: ResourceId) -> Result<Vec<Bill>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let bills = bills::bills_for_user(user_id, &mut conn).await?;
        Ok(bills)
    }

    async fn fetch_bill_by_id(&self, id: ResourceId) -> Result<Option<Bill>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let bill = bills::bill_by_id(id, &mut conn).await?;
        Ok(bill)
    }

    async fn fetch_payments_for_user(&self, user_id: ResourceId) -> Result<Vec<Payment>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let payments = payments::payments_for_user(user_id, &mut conn).await?;
        Ok(payments)
    }

    async fn fetch_payments_for_bill(&self, bill_id: ResourceId) -> Result<Vec<Payment>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let payments = payments::payments_for_bill(bill_id, &mut conn).await?;
        Ok(payments)
    }

    async fn fetch_bill_stats(&self) -> Result<BillStats, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let stats = payments::bill_stats(&mut conn).await?;
        Ok(stats)
    }
}

impl AuthManagement for SqliteDatabase {
    async fn create_user(&self, user: NewUser) -> Result<User, AuthApiError> {
        let mut conn = self.pool.acquire().await.map_err(|e| AuthApiError::DatabaseError(e.to_string()))?;
        users::insert_user(user, &mut conn).await
    }

    async fn fetch_credentials(&self, username: &str) -> Result<UserCredentials, AuthApiError> {
        let mut conn = self.pool.acquire().await.map_err(|e| AuthApiError::DatabaseError(e.to_string()))?;
        let creds = users::credentials_by_username(username, &mut conn).await?;
        creds.ok_or(AuthApiError::UserNotFound)
    }
}

impl NotificationManagement for SqliteDatabase {
    async fn insert_notification(&self, notification: NewNotification) -> Result<Notification, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let notification = notifications::insert_notification(notification, &mut conn).await?;
        Ok(notification)
    }

    async fn fetch_latest_notifications(
        &self,
        user_id: ResourceId,
        limit: i64,
    ) -> Result<Vec<Notification>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let notifications = notifications::latest_notifications(user_id, limit, &mut conn).await?;
        Ok(notifications)
    }

    async fn register_device_token(&self, user_id: ResourceId, token: &str) -> Result<(), AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let updated = users::update_device_token(user_id, token, &mut conn).await?;
        if !updated {
            return Err(AccountApiError::UserNotFound(user_id));
        }
        Ok(())
    }

    async fn fetch_device_token(&self, user_id: ResourceId) -> Result<Option<String>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let token = users::device_token(user_id, &mut conn).await?;
        Ok(token)
    }
}

impl IssueTracking for SqliteDatabase {
    async fn report_issue(&self, issue: NewIssue) -> Result<Issue, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let user_id = issue.user_id;
        if users::user_by_id(user_id, &mut conn).await?.is_none() {
            return Err(AccountApiError::UserNotFound(user_id));
        }
        let issue = issues::insert_issue(issue, &mut conn).await?;
        Ok(issue)
    }

    async fn fetch_issues(&self) -> Result<Vec<Issue>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let issues = issues::all_issues(&mut conn).await?;
        Ok(issues)
    }

    async fn fetch_issues_for_user(&self, user_id: ResourceId) -> Result<Vec<Issue>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let issues = issues::issues_for_user(user_id, &mut conn).await?;
        Ok(issues)
    }

    async fn update_issue(&self, id: ResourceId, update: IssueUpdate) -> Result<Issue, AccountApiError> {
        if update.is_empty() {
            return Err(AccountApiError::QueryError("The issue update contains no fields".to_string()));
        }
        let mut conn = self.pool.acquire().await?;
        let issue = issues::update_issue(id, update, &mut conn).await?;
        issue.ok_or(AccountApiError::IssueNotFound(id))
    }
}

impl SettingsManagement for SqliteDatabase {
    async fn fetch_settings(&self) -> Result<SystemSettings, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let settings = settings::fetch_or_create_settings(&mut conn).await?;
        Ok(settings)
    }

    async fn replace_settings(&self, settings: NewSystemSettings) -> Result<SystemSettings, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let settings = settings::insert_settings(settings, &mut conn).await?;
        Ok(settings)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Applies any pending schema migrations. The server runs this at startup so that a fresh database file
    /// is usable without a separate provisioning step.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&mut self) -> Result<(), sqlx::Error> {
        self.pool.close().await;
        Ok(())
    }
}
