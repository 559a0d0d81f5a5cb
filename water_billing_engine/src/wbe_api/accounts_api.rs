//! Unified API for querying consumer accounts and their history.

use std::fmt::Debug;

use crate::{
    db_types::{Bill, BillStats, MeterReading, Payment, ResourceId, User},
    query_objects::UserQueryFilter,
    traits::{AccountApiError, AccountManagement},
};

/// The `AccountApi` provides a unified API for querying users and their reading, bill and payment history.
pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: AccountManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches the user with the given id. If no user exists, `None` is returned.
    pub async fn user_by_id(&self, id: ResourceId) -> Result<Option<User>, AccountApiError> {
        self.db.fetch_user_by_id(id).await
    }

    pub async fn user_by_username(&self, username: &str) -> Result<Option<User>, AccountApiError> {
        self.db.fetch_user_by_username(username).await
    }

    pub async fn search_users(&self, query: UserQueryFilter) -> Result<Vec<User>, AccountApiError> {
        self.db.search_users(query).await
    }

    /// Readings for a user, newest first. The user must exist.
    pub async fn readings_for_user(&self, user_id: ResourceId) -> Result<Vec<MeterReading>, AccountApiError> {
        self.assert_user_exists(user_id).await?;
        self.db.fetch_readings_for_user(user_id).await
    }

    /// Bills for a user, newest first. The user must exist.
    pub async fn bills_for_user(&self, user_id: ResourceId) -> Result<Vec<Bill>, AccountApiError> {
        self.assert_user_exists(user_id).await?;
        self.db.fetch_bills_for_user(user_id).await
    }

    pub async fn bill_by_id(&self, id: ResourceId) -> Result<Option<Bill>, AccountApiError> {
        self.db.fetch_bill_by_id(id).await
    }

    /// Payment history for a user, newest first. The user must exist.
    pub async fn payments_for_user(&self, user_id: ResourceId) -> Result<Vec<Payment>, AccountApiError> {
        self.assert_user_exists(user_id).await?;
        self.db.fetch_payments_for_user(user_id).await
    }

    pub async fn payments_for_bill(&self, bill_id: ResourceId) -> Result<Vec<Payment>, AccountApiError> {
        self.db.fetch_payments_for_bill(bill_id).await
    }

    pub async fn bill_stats(&self) -> Result<BillStats, AccountApiError> {
        self.db.fetch_bill_stats().await
    }

    async fn assert_user_exists(&self, user_id: ResourceId) -> Result<(), AccountApiError> {
        match self.db.fetch_user_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AccountApiError::UserNotFound(user_id)),
        }
    }
}
