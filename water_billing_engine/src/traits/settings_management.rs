use crate::{
    db_types::{NewSystemSettings, SystemSettings},
    traits::AccountApiError,
};

/// Access to the utility's billing configuration. One logical record; the latest row wins.
#[allow(async_fn_in_trait)]
pub trait SettingsManagement {
    /// Returns the current settings record, creating the default record first if none exists yet.
    async fn fetch_settings(&self) -> Result<SystemSettings, AccountApiError>;

    /// Replaces the settings wholesale. Last writer wins; the previous record is kept for audit.
    async fn replace_settings(&self, settings: NewSystemSettings) -> Result<SystemSettings, AccountApiError>;
}
