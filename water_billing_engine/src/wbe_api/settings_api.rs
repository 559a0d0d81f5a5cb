use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{NewSystemSettings, SystemSettings},
    traits::{AccountApiError, SettingsManagement},
};

/// The `SettingsApi` reads and replaces the utility's billing configuration.
pub struct SettingsApi<B> {
    db: B,
}

impl<B: Debug> Debug for SettingsApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SettingsApi ({:?})", self.db)
    }
}

impl<B> SettingsApi<B>
where B: SettingsManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// The current settings record. Creates the defaults first if the table is empty.
    pub async fn current(&self) -> Result<SystemSettings, AccountApiError> {
        self.db.fetch_settings().await
    }

    /// Replaces the settings wholesale. Bills priced after this call use the new tariff.
    pub async fn replace(&self, settings: NewSystemSettings) -> Result<SystemSettings, AccountApiError> {
        let settings = self.db.replace_settings(settings).await?;
        info!(
            "🪛️ Billing settings replaced. Rate is now {} per cu.m, minimum charge {}",
            settings.water_rate_per_cubic_meter, settings.minimum_charge
        );
        Ok(settings)
    }
}
