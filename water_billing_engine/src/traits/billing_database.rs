use thiserror::Error;

use crate::{
    billing::BillingCalculationError,
    db_types::{Bill, MeterReading, NewMeterReading, Payment, ResourceId, SystemSettings},
    traits::{
        data_objects::BillSettlement,
        AccountApiError,
        AccountManagement,
        NotificationManagement,
        SettingsManagement,
    },
};

#[derive(Debug, Clone, Error)]
pub enum BillingError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Could not price the bill. {0}")]
    InvalidReading(#[from] BillingCalculationError),
    #[error("User #{0} does not exist")]
    UserNotFound(ResourceId),
    #[error("Meter reading #{0} does not exist")]
    ReadingNotFound(ResourceId),
    #[error("Bill #{0} does not exist")]
    BillNotFound(ResourceId),
    #[error("Bill #{0} has already been settled")]
    BillAlreadySettled(ResourceId),
    #[error("A bill already exists for meter reading #{0}")]
    BillAlreadyExists(ResourceId),
    #[error(transparent)]
    AccountError(#[from] AccountApiError),
}

impl From<sqlx::Error> for BillingError {
    fn from(e: sqlx::Error) -> Self {
        BillingError::DatabaseError(e.to_string())
    }
}

/// This trait defines the highest level of behaviour for backends supporting the billing engine: the atomic flows
/// that turn meter readings into bills and settlements into payment records.
///
/// Everything here runs inside a single database transaction per call. The durable notification row that
/// accompanies a new bill or a settlement is written in the same transaction; push delivery and live broadcast
/// happen afterwards via event hooks.
#[allow(async_fn_in_trait)]
pub trait BillingDatabase:
    Clone + AccountManagement + SettingsManagement + NotificationManagement
{
    /// The URL of the database
    fn url(&self) -> &str;

    /// In one atomic transaction:
    /// * stores the reading,
    /// * finds the most recent *other* reading for the user (or 0 for a first reading),
    /// * prices the consumption against the given settings snapshot,
    /// * stores the resulting bill,
    /// * stores a "new bill" notification for the consumer.
    ///
    /// A reading that would produce negative consumption rolls the whole transaction back.
    async fn process_new_reading(
        &self,
        reading: NewMeterReading,
        settings: &SystemSettings,
    ) -> Result<(MeterReading, Bill), BillingError>;

    /// Creates a bill for a reading that was stored without one. At most one bill can exist per reading;
    /// a second call returns [`BillingError::BillAlreadyExists`].
    async fn create_bill_for_reading(
        &self,
        reading_id: ResourceId,
        settings: &SystemSettings,
    ) -> Result<Bill, BillingError>;

    /// Settles a bill exactly once. In one atomic transaction:
    /// * flips `is_paid` and zeroes `amount_due` with a guarded conditional update,
    /// * records the payment for the bill's pre-settlement amount plus the method's fee,
    /// * stores a "payment received" notification for the consumer.
    ///
    /// If the guard does not fire, the bill is fetched to distinguish [`BillingError::BillNotFound`] from
    /// [`BillingError::BillAlreadySettled`]. Concurrent triggers therefore leave exactly one payment row.
    async fn settle_bill(&self, settlement: BillSettlement) -> Result<(Bill, Payment), BillingError>;
}
