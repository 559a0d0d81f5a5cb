use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Bill, MeterReading, NewMeterReading, Payment, ResourceId},
    events::{BillCreatedEvent, BillPaidEvent, EventProducers, ReadingRecordedEvent},
    traits::{BillSettlement, BillingDatabase, BillingError},
};

/// `BillingFlowApi` is the primary API for turning meter readings into bills and settlements into payment records.
///
/// Both settlement triggers (the direct gateway response and the asynchronous webhook) funnel into
/// [`Self::settle_bill`], whose backing store guarantees that a bill settles exactly once.
pub struct BillingFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for BillingFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BillingFlowApi")
    }
}

impl<B> BillingFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }
}

impl<B> BillingFlowApi<B>
where B: BillingDatabase
{
    /// Ingests a new meter reading.
    ///
    /// The reading is stored and billed against the current settings snapshot in a single transaction, together
    /// with the consumer's "new bill" notification. `ReadingRecorded` and `BillCreated` events fire after the
    /// transaction commits.
    pub async fn ingest_reading(&self, reading: NewMeterReading) -> Result<(MeterReading, Bill), BillingError> {
        let settings = self.db.fetch_settings().await?;
        let (reading, bill) = self.db.process_new_reading(reading, &settings).await?;
        self.call_reading_recorded_hook(&reading).await;
        self.call_bill_created_hook(&bill).await;
        debug!(
            "🔄️💧️ Reading #{} for user #{} processed. Bill #{} issued for {}",
            reading.id, reading.user_id, bill.id, bill.amount_due
        );
        Ok((reading, bill))
    }

    /// Creates a bill for a reading that was stored without one. At most one bill can exist per reading.
    pub async fn bill_reading(&self, reading_id: ResourceId) -> Result<Bill, BillingError> {
        let settings = self.db.fetch_settings().await?;
        let bill = self.db.create_bill_for_reading(reading_id, &settings).await?;
        self.call_bill_created_hook(&bill).await;
        debug!("🔄️🧾️ Bill #{} issued for reading #{reading_id} ({})", bill.id, bill.amount_due);
        Ok(bill)
    }

    /// Settles a bill exactly once, whichever trigger got here first.
    ///
    /// Returns the settled bill and the payment record. A second settlement attempt surfaces
    /// [`BillingError::BillAlreadySettled`] and records nothing.
    pub async fn settle_bill(&self, settlement: BillSettlement) -> Result<(Bill, Payment), BillingError> {
        let bill_id = settlement.bill_id;
        trace!("🔄️💰️ Settling bill #{bill_id} via {}", settlement.method);
        let (bill, payment) = self.db.settle_bill(settlement).await?;
        self.call_bill_paid_hook(&bill, &payment).await;
        debug!(
            "🔄️💰️ Bill #{bill_id} settled. {} received via {} (fee {})",
            payment.amount, payment.method, payment.fee
        );
        Ok((bill, payment))
    }

    async fn call_reading_recorded_hook(&self, reading: &MeterReading) {
        for emitter in &self.producers.reading_recorded_producer {
            trace!("🔄️💧️ Notifying reading recorded hook subscribers");
            let event = ReadingRecordedEvent::new(reading.clone());
            emitter.publish_event(event).await;
        }
    }

    async fn call_bill_created_hook(&self, bill: &Bill) {
        for emitter in &self.producers.bill_created_producer {
            trace!("🔄️🧾️ Notifying bill created hook subscribers");
            let event = BillCreatedEvent::new(bill.clone());
            emitter.publish_event(event).await;
        }
    }

    async fn call_bill_paid_hook(&self, bill: &Bill, payment: &Payment) {
        for emitter in &self.producers.bill_paid_producer {
            trace!("🔄️💰️ Notifying bill paid hook subscribers");
            let event = BillPaidEvent::new(bill.clone(), payment.clone());
            emitter.publish_event(event).await;
        }
    }
}
