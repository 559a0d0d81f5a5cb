//! Wire objects for the PayMongo payment-intent API.
//!
//! PayMongo wraps every request and response in a `data` envelope, with the useful fields nested one level
//! down under `attributes`. The types here mirror that shape exactly. Amounts are always integer centavos on
//! the wire.

use serde::{Deserialize, Serialize};
use wbs_common::Centavos;

/// The intent status that indicates the payment went through.
pub const INTENT_STATUS_SUCCEEDED: &str = "succeeded";
/// The webhook event name for a completed payment.
pub const EVENT_PAYMENT_SUCCESS: &str = "payment.success";

//--------------------------------------      Envelopes       --------------------------------------------------------

/// The `{"data": …}` wrapper around every PayMongo body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// The `{"attributes": …}` wrapper that request payloads sit inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attributes<T> {
    pub attributes: T,
}

impl<T> Envelope<Attributes<T>> {
    /// Wraps a request payload in the full `{"data":{"attributes": …}}` envelope.
    pub fn wrap(attributes: T) -> Self {
        Envelope { data: Attributes { attributes } }
    }
}

//--------------------------------------    Payment intents   --------------------------------------------------------

/// A payment intent resource, as returned by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(rename = "type", default)]
    pub resource_type: String,
    pub attributes: PaymentIntentAttributes,
}

impl PaymentIntent {
    pub fn is_succeeded(&self) -> bool {
        self.attributes.status == INTENT_STATUS_SUCCEEDED
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntentAttributes {
    pub amount: Centavos,
    pub currency: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub statement_descriptor: Option<String>,
    /// One of `awaiting_payment_method`, `awaiting_next_action`, `processing`, `succeeded` or
    /// `payment_failed`.
    pub status: String,
    /// Handed to the client so that it can drive 3DS / e-wallet authorization itself.
    #[serde(default)]
    pub client_key: Option<String>,
    #[serde(default)]
    pub payment_method_allowed: Vec<String>,
    /// Redirect instructions for flows that need payer action. Passed through untouched.
    #[serde(default)]
    pub next_action: Option<serde_json::Value>,
    #[serde(default)]
    pub last_payment_error: Option<serde_json::Value>,
}

/// Parameters for creating a payment intent.
///
/// [`crate::PayMongoApi::create_payment_intent`] wraps this in the request envelope. The defaults match what
/// the gateway expects for a PHP water-bill payment: automatic capture, 3DS on demand for cards, and the
/// e-wallet methods enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPaymentIntent {
    pub amount: Centavos,
    pub payment_method_allowed: Vec<String>,
    pub payment_method_options: PaymentMethodOptions,
    pub currency: String,
    pub capture_type: String,
    pub description: String,
    /// What shows up on the payer's card / e-wallet statement.
    pub statement_descriptor: String,
}

impl NewPaymentIntent {
    pub fn new<S: Into<String>>(amount: Centavos, description: S) -> Self {
        Self {
            amount,
            payment_method_allowed: vec!["gcash".into(), "paymaya".into()],
            payment_method_options: PaymentMethodOptions::default(),
            currency: wbs_common::PESO_CURRENCY_CODE.into(),
            capture_type: "automatic".into(),
            description: description.into(),
            statement_descriptor: "Water Billing".into(),
        }
    }

    pub fn with_methods(mut self, methods: Vec<String>) -> Self {
        self.payment_method_allowed = methods;
        self
    }

    pub fn with_statement_descriptor<S: Into<String>>(mut self, descriptor: S) -> Self {
        self.statement_descriptor = descriptor.into();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethodOptions {
    pub card: CardOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardOptions {
    pub request_three_d_secure: String,
}

impl Default for PaymentMethodOptions {
    fn default() -> Self {
        Self { card: CardOptions { request_three_d_secure: "any".into() } }
    }
}

/// Parameters for attaching a payment method to an existing intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachPaymentMethod {
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<String>,
    pub return_url: String,
}

impl AttachPaymentMethod {
    pub fn new<S: Into<String>>(payment_method: S, return_url: S) -> Self {
        Self { payment_method: payment_method.into(), client_key: None, return_url: return_url.into() }
    }

    pub fn with_client_key<S: Into<String>>(mut self, client_key: S) -> Self {
        self.client_key = Some(client_key.into());
        self
    }
}

//--------------------------------------       Webhooks       --------------------------------------------------------

/// The body PayMongo posts to a webhook endpoint. The interesting part is two envelopes deep: the event
/// attributes carry the event name and, nested inside, the payment resource the event is about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub data: WebhookEventData,
}

impl WebhookEvent {
    pub fn event_type(&self) -> &str {
        &self.data.attributes.event_type
    }

    pub fn payment(&self) -> &PaymentResourceAttributes {
        &self.data.attributes.data.attributes
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEventData {
    #[serde(default)]
    pub id: String,
    pub attributes: WebhookEventAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEventAttributes {
    /// The event name, e.g. `payment.success`.
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: PaymentResource,
}

/// The payment record an event refers to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResource {
    #[serde(default)]
    pub id: String,
    pub attributes: PaymentResourceAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResourceAttributes {
    pub amount: Centavos,
    /// Free text, carried over from the intent. Ours embeds the bill reference.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source: Option<PaymentSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSource {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub source_type: String,
}
