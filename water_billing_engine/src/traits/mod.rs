//! # Database management and control.
//!
//! This module defines the interface contracts that a storage backend must satisfy to drive the billing engine.
//!
//! ## Traits
//!
//! * [`BillingDatabase`] is the highest level of behaviour: the atomic reading-to-bill and bill-settlement flows.
//! * [`AccountManagement`] provides queries over users, readings, bills and payments.
//! * [`AuthManagement`] stores credentials and creates accounts.
//! * [`NotificationManagement`] stores notification records and device push tokens.
//! * [`IssueTracking`] records and updates reported supply issues.
//! * [`SettingsManagement`] reads and replaces the billing configuration record.
mod account_management;
mod auth_management;
mod billing_database;
mod data_objects;
mod issue_tracking;
mod notification_management;
mod settings_management;

pub use account_management::{AccountApiError, AccountManagement};
pub use auth_management::{AuthApiError, AuthManagement};
pub use billing_database::{BillingDatabase, BillingError};
pub use data_objects::BillSettlement;
pub use issue_tracking::IssueTracking;
pub use notification_management::NotificationManagement;
pub use settings_management::SettingsManagement;
