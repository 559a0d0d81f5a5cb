use chrono::{DateTime, Utc};

use crate::db_types::{PaymentMethod, ResourceId};

/// Everything needed to settle a bill, whichever trigger produced it.
///
/// The amount is deliberately absent. A settlement always pays the bill's outstanding amount; the payment record
/// takes its value from the bill row inside the settlement transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillSettlement {
    pub bill_id: ResourceId,
    pub method: PaymentMethod,
    /// The gateway's payment intent id, for gateway-triggered settlements.
    pub gateway_ref: Option<String>,
    /// When the payment was made. Defaults to now.
    pub paid_on: Option<DateTime<Utc>>,
}

impl BillSettlement {
    pub fn new(bill_id: ResourceId, method: PaymentMethod) -> Self {
        Self { bill_id, method, gateway_ref: None, paid_on: None }
    }

    pub fn with_gateway_ref<S: Into<String>>(mut self, gateway_ref: S) -> Self {
        self.gateway_ref = Some(gateway_ref.into());
        self
    }

    pub fn paid_on(mut self, when: DateTime<Utc>) -> Self {
        self.paid_on = Some(when);
        self
    }
}
