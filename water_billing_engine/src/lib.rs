//! Water Billing Engine
//!
//! The Water Billing Engine is a service that lets a small water utility bill its consumers for metered usage and
//! collect payments in cash or through a card/e-wallet gateway. This library contains the core logic for the
//! billing engine. It is provider-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@traits`] and the SQLite backend). You should never need to access the
//!    database directly. Instead, use the public API provided by the billing engine. The exception is the data
//!    types used in the database. These are defined in the `db_types` module and are public.
//! 2. The billing engine public API ([`mod@wbe_api`]). This provides the public-facing functionality of the
//!    billing engine. It is responsible for managing consumers, meter readings, bills, payments, notifications
//!    and supply issues. Specific backends need to implement the traits in this module in order to act as a
//!    backend for the Water Billing Server.
//!
//! The engine also provides a set of events that can be subscribed to. These events are emitted when certain
//! actions occur within the billing engine. For example, when a meter reading produces a bill, a `BillCreated`
//! event is emitted. A simple Actor framework is used so that you can easily hook into these events and perform
//! custom actions.
pub mod billing;
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod traits;
mod wbe_api;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use wbe_api::{
    accounts_api::AccountApi,
    auth_api::AuthApi,
    billing_flow_api::BillingFlowApi,
    issues_api::IssueApi,
    notifications_api::{NotificationApi, NOTIFICATION_PAGE_SIZE},
    query_objects,
    settings_api::SettingsApi,
};
