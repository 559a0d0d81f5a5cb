//! Request and response bodies for the HTTP surface.
//!
//! Every endpoint deserializes into an explicit struct here rather than poking fields out of loose JSON, so
//! malformed bodies are rejected with a 400 before any handler logic runs. Identifiers ride through
//! [`ResourceId`] and are strings on the wire.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use paymongo_tools::PaymentIntent;
use serde::{Deserialize, Serialize};
use water_billing_engine::db_types::{Bill, MeterReading, Payment, PaymentMethod, ResourceId, Role, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// Body for `POST /auth/register`. The password arrives in plaintext over TLS and is bcrypt-hashed before it
/// goes anywhere near the database. Role defaults to `customer` when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
    pub full_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub purok: Option<String>,
    #[serde(default)]
    pub meter_number: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Returned by both `/auth/login` and `/auth/register`: a fresh access token plus the user record it was
/// issued for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Returned by `POST /api/readings`: the stored reading and the bill it generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingWithBill {
    pub reading: MeterReading,
    pub bill: Bill,
}

/// Body for `POST /api/bills`: bill an already-captured reading that has no bill yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBillRequest {
    pub reading_id: ResourceId,
}

/// Body for `POST /api/payments`: staff records a cash or over-the-counter settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub bill_id: ResourceId,
    pub method: PaymentMethod,
    /// When the money actually changed hands. Defaults to now.
    #[serde(default)]
    pub payment_date: Option<DateTime<Utc>>,
}

/// Returned by every settlement path: the bill in its settled state and the payment row that settled it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementResponse {
    pub bill: Bill,
    pub payment: Payment,
}

/// Body for `POST /api/checkout`: start a gateway payment for a bill. The amount always comes from the
/// bill's outstanding balance, never from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub bill_id: ResourceId,
    /// Restrict the intent to specific gateway method codes, e.g. `["gcash"]`. Defaults to the standard set.
    #[serde(default)]
    pub payment_methods: Option<Vec<String>>,
}

/// Body for `POST /api/checkout/attach`: confirm a payment by attaching the tokenized method to the intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachRequest {
    pub payment_intent_id: String,
    pub payment_method_id: String,
    #[serde(default)]
    pub client_key: Option<String>,
    pub bill_id: ResourceId,
    pub method: PaymentMethod,
}

/// Returned by `POST /api/checkout/attach`. `payment` is present only when the gateway reported the intent
/// as succeeded and the bill was settled in this call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachResponse {
    pub payment_intent: PaymentIntent,
    #[serde(default)]
    pub payment: Option<Payment>,
}

/// Body for `POST /api/device-token`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceTokenRequest {
    pub user_id: ResourceId,
    pub device_token: String,
}

/// Body for `POST /api/issues`. The reporter is taken from the access token, not the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRequest {
    pub description: String,
}
