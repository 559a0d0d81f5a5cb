//! Real-time event broadcasting over server-sent events.
//!
//! Every billing event (new reading, new bill, new payment) is mirrored to connected clients on the public
//! `GET /live` endpoint. Delivery is best-effort and at-most-once: a client that is not connected, or that
//! falls too far behind, simply misses events. The durable record is the notifications table, never this
//! stream.

use std::convert::Infallible;

use actix_web::{get, web, HttpResponse};
use log::{debug, trace};
use serde_json::json;
use tokio::sync::broadcast;
use water_billing_engine::db_types::{Bill, MeterReading, Payment};

/// SSE event name for a freshly ingested meter reading.
pub const EVENT_NEW_METER_READING: &str = "newMeterReading";
/// SSE event name for a newly created bill.
pub const EVENT_BILL_CREATED: &str = "billCreated";
/// SSE event name for a recorded payment.
pub const EVENT_NEW_PAYMENT: &str = "newPayment";

/// How many events a slow client may fall behind before it starts missing them.
const CHANNEL_CAPACITY: usize = 64;

/// A single named event with its JSON payload, as it appears on the SSE stream.
#[derive(Debug, Clone)]
pub struct LiveEvent {
    pub event: &'static str,
    pub payload: serde_json::Value,
}

impl LiveEvent {
    pub fn new_meter_reading(reading: &MeterReading) -> Self {
        let payload = json!({
            "message": format!("New meter reading from user ID: {}", reading.user_id),
            "data": reading,
        });
        Self { event: EVENT_NEW_METER_READING, payload }
    }

    pub fn bill_created(bill: &Bill) -> Self {
        let payload = json!({
            "message": format!("New bill created for user ID: {}", bill.user_id),
            "data": bill,
        });
        Self { event: EVENT_BILL_CREATED, payload }
    }

    pub fn new_payment(payment: &Payment) -> Self {
        let payload = json!({
            "message": format!("Payment received for bill ID: {}", payment.bill_id),
            "data": payment,
        });
        Self { event: EVENT_NEW_PAYMENT, payload }
    }

    /// Render the event as a wire-ready SSE frame.
    pub fn sse_frame(&self) -> String {
        format!("event: {}\ndata: {}\n\n", self.event, self.payload)
    }
}

/// Fans [`LiveEvent`]s out to every connected SSE client. Cheap to clone; the server hands one to the event
/// hooks at startup and shares the same instance with the `/live` endpoint as app data, so the fan-out can
/// be tested without a running server.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<LiveEvent>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish an event. Sending with no connected clients is normal, not an error.
    pub fn publish(&self, event: LiveEvent) {
        match self.sender.send(event) {
            Ok(n) => trace!("📡️ Live event sent to {n} client(s)"),
            Err(_) => trace!("📡️ Live event dropped. No clients are connected."),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// The SSE endpoint. Holds the connection open and forwards every published event to the client.
#[get("/live")]
pub async fn live_events(broadcaster: web::Data<EventBroadcaster>) -> HttpResponse {
    trace!("📡️ New live events subscriber");
    let rx = broadcaster.subscribe();
    let stream = futures::stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let frame = web::Bytes::from(event.sse_frame());
                    return Some((Ok::<_, Infallible>(frame), rx));
                },
                // A lagged client misses the overwritten events but stays connected.
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    debug!("📡️ A live events client lagged behind and missed {missed} event(s)");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });
    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(stream)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frames_carry_event_name_and_json_payload() {
        let event = LiveEvent { event: EVENT_NEW_PAYMENT, payload: json!({"message": "hi"}) };
        assert_eq!(event.sse_frame(), "event: newPayment\ndata: {\"message\":\"hi\"}\n\n");
    }

    #[tokio::test]
    async fn events_reach_subscribers() {
        let broadcaster = EventBroadcaster::new();
        let mut rx = broadcaster.subscribe();
        broadcaster.publish(LiveEvent { event: EVENT_BILL_CREATED, payload: json!({"n": 1}) });
        let received = rx.recv().await.unwrap();
        assert_eq!(received.event, EVENT_BILL_CREATED);
        assert_eq!(received.payload["n"], 1);
    }

    #[test]
    fn publishing_without_subscribers_is_not_an_error() {
        let broadcaster = EventBroadcaster::new();
        broadcaster.publish(LiveEvent { event: EVENT_NEW_METER_READING, payload: json!({}) });
    }
}
