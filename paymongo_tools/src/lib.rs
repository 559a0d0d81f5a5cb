//! # PayMongo tools
//!
//! A thin REST client for the PayMongo payment-intent API, plus the wire objects the water billing server
//! exchanges with the gateway: payment intents, attach requests and webhook event bodies.
//!
//! The client deliberately covers only the slice of the gateway the billing server uses: creating an intent
//! for a bill, attaching a payment method to it, and reading an intent back. Webhook *verification* is not
//! done here; the server checks the HMAC signature before these types ever see the body.

mod api;
mod config;
mod error;

pub mod data_objects;

pub use api::PayMongoApi;
pub use config::{PayMongoConfig, DEFAULT_PAYMONGO_API_URL};
pub use data_objects::{AttachPaymentMethod, NewPaymentIntent, PaymentIntent, WebhookEvent};
pub use error::PayMongoApiError;
