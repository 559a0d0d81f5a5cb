//! # Billing engine public API
//!
//! The `wbe_api` module exposes the programmatic API for the billing engine. The API is modular so that clients can
//! pick and choose the functionality they need; each API is generic over a backend that implements the matching
//! trait(s) from [`crate::traits`].
//!
//! * [`accounts_api`] queries users and their reading, bill and payment history.
//! * [`auth_api`] creates accounts and fetches stored credentials.
//! * [`billing_flow_api`] runs the reading-to-bill and settlement flows and publishes their events.
//! * [`notifications_api`] reads notification records and manages device push tokens.
//! * [`issues_api`] records and updates reported supply issues.
//! * [`settings_api`] reads and replaces the billing configuration.
//!
//! # API usage
//!
//! The pattern for using all the APIs is the same. An API instance is created by supplying a database backend that
//! implements the specific backend traits required by the API.
//!
//! ```rust,ignore
//! use water_billing_engine::{AccountApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(&url, 25).await?;
//! // SqliteDatabase implements AccountManagement
//! let api = AccountApi::new(db);
//! let user = api.user_by_username("delia").await?;
//! ```

pub mod accounts_api;
pub mod auth_api;
pub mod billing_flow_api;
pub mod issues_api;
pub mod notifications_api;
pub mod query_objects;
pub mod settings_api;
