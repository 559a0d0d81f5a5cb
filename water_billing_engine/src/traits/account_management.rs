use thiserror::Error;

use crate::{
    db_types::{Bill, BillStats, MeterReading, Payment, ResourceId, User},
    query_objects::UserQueryFilter,
};

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User #{0} does not exist")]
    UserNotFound(ResourceId),
    #[error("Issue #{0} does not exist")]
    IssueNotFound(ResourceId),
    #[error("User error constructing query: {0}")]
    QueryError(String),
}

impl From<sqlx::Error> for AccountApiError {
    fn from(e: sqlx::Error) -> Self {
        AccountApiError::DatabaseError(e.to_string())
    }
}

/// The `AccountManagement` trait provides queries over the records the billing engine keeps about a consumer:
/// the user itself, their meter readings, their bills and the payments made against those bills.
///
/// The [`BillingDatabase`](crate::traits::BillingDatabase) trait handles the flows that create and mutate these
/// records; `AccountManagement` is read-only.
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    /// Fetches the user with the given id. If no user exists, `None` is returned.
    async fn fetch_user_by_id(&self, id: ResourceId) -> Result<Option<User>, AccountApiError>;

    /// Fetches the user with the given (unique) username.
    async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, AccountApiError>;

    /// Returns users matching the given filter. An empty filter returns everyone.
    async fn search_users(&self, query: UserQueryFilter) -> Result<Vec<User>, AccountApiError>;

    /// Readings for a user, newest first.
    async fn fetch_readings_for_user(&self, user_id: ResourceId) -> Result<Vec<MeterReading>, AccountApiError>;

    async fn fetch_reading_by_id(&self, id: ResourceId) -> Result<Option<MeterReading>, AccountApiError>;

    /// Bills for a user, newest first.
    async fn fetch_bills_for_user(&self, user_id: ResourceId) -> Result<Vec<Bill>, AccountApiError>;

    async fn fetch_bill_by_id(&self, id: ResourceId) -> Result<Option<Bill>, AccountApiError>;

    /// Payment history for a user, newest first.
    async fn fetch_payments_for_user(&self, user_id: ResourceId) -> Result<Vec<Payment>, AccountApiError>;

    /// All payments recorded against a bill. The settlement guard keeps this at most one.
    async fn fetch_payments_for_bill(&self, bill_id: ResourceId) -> Result<Vec<Payment>, AccountApiError>;

    /// Headline pending/paid counts and revenue for the current month.
    async fn fetch_bill_stats(&self) -> Result<BillStats, AccountApiError>;
}
