use serde::Serialize;

use crate::db_types::{Bill, MeterReading, Payment};

/// Emitted after a meter reading has been stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingRecordedEvent {
    pub reading: MeterReading,
}

impl ReadingRecordedEvent {
    pub fn new(reading: MeterReading) -> Self {
        Self { reading }
    }
}

/// Emitted after a bill has been created for a reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillCreatedEvent {
    pub bill: Bill,
}

impl BillCreatedEvent {
    pub fn new(bill: Bill) -> Self {
        Self { bill }
    }
}

/// Emitted after a bill has been settled, whichever path settled it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillPaidEvent {
    pub bill: Bill,
    pub payment: Payment,
}

impl BillPaidEvent {
    pub fn new(bill: Bill, payment: Payment) -> Self {
        Self { bill, payment }
    }
}
