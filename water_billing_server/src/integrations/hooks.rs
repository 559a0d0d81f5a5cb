//! Startup wiring between the billing engine's event stream and the delivery channels.
//!
//! Three hooks are registered against the engine:
//!
//! 1. ReadingRecordedEvent - mirrored to live clients as a `newMeterReading` event.
//! 2. BillCreatedEvent - mirrored to live clients as `billCreated`, and pushed to the bill owner's device if
//!    one is registered.
//! 3. BillPaidEvent - mirrored to live clients as `newPayment`, with the matching push to the payer.
//!
//! The durable notification row is written inside the engine's own transaction before these hooks ever fire;
//! everything here is best-effort fan-out on top of that record.

use futures::future::BoxFuture;
use log::*;
use water_billing_engine::{
    db_types::Bill,
    events::{BillPaidEvent, EventHandlers, EventHooks},
    NotificationApi,
    SqliteDatabase,
};

use crate::{
    integrations::PushGateway,
    live_events::{EventBroadcaster, LiveEvent},
};

pub const BILLING_EVENT_BUFFER_SIZE: usize = 25;

/// Assigns handlers for the engine's billing events.
///
/// The returned [`EventHandlers`] still has to be started (and its producers handed to the billing flow API)
/// by the caller; see [`run_server`](crate::server::run_server).
pub fn create_billing_event_handlers(
    db: SqliteDatabase,
    broadcaster: EventBroadcaster,
    push: PushGateway,
) -> EventHandlers {
    let mut hooks = EventHooks::default();
    // --- On ReadingRecorded handler ---
    let bc = broadcaster.clone();
    hooks.on_reading_recorded(move |ev| {
        bc.publish(LiveEvent::new_meter_reading(&ev.reading));
        no_op()
    });
    // --- On BillCreated handler ---
    let bc = broadcaster.clone();
    let bill_db = db.clone();
    let bill_push = push.clone();
    hooks.on_bill_created(move |ev| {
        let bill = ev.bill;
        bc.publish(LiveEvent::bill_created(&bill));
        let db = bill_db.clone();
        let push = bill_push.clone();
        Box::pin(async move {
            let body = format!(
                "Your new water bill of {} is due on {}.",
                bill.amount_due,
                bill.due_date.format("%d %b %Y")
            );
            push_to_owner(db, push, &bill, "New water bill", &body).await;
        })
    });
    // --- On BillPaid handler ---
    hooks.on_bill_paid(move |ev| {
        let BillPaidEvent { bill, payment } = ev;
        broadcaster.publish(LiveEvent::new_payment(&payment));
        let db = db.clone();
        let push = push.clone();
        Box::pin(async move {
            let body = format!(
                "We received your payment of {} for bill #{} via {}. Thank you!",
                payment.amount, bill.id, payment.method
            );
            push_to_owner(db, push, &bill, "Payment received", &body).await;
        })
    });
    EventHandlers::new(BILLING_EVENT_BUFFER_SIZE, hooks)
}

/// Push a notification to the device registered for the bill's owner, if there is one.
async fn push_to_owner(db: SqliteDatabase, push: PushGateway, bill: &Bill, title: &str, body: &str) {
    let notifications = NotificationApi::new(db);
    match notifications.device_token(bill.user_id).await {
        Ok(Some(token)) => push.send(&token, title, body).await,
        Ok(None) => debug!("📲️ User #{} has no device token. Not pushing '{title}'", bill.user_id),
        Err(e) => warn!("📲️ Could not look up a device token for user #{}. {e}", bill.user_id),
    }
}

fn no_op() -> BoxFuture<'static, ()> {
    Box::pin(async {})
}
