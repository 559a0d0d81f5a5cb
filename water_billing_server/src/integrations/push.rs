//! Push-notification delivery.
//!
//! Billing events that matter to a customer (a new bill, a received payment) are pushed to their device
//! through a relay endpoint (`WBS_PUSH_ENDPOINT`) that fronts the device-messaging service. Delivery is
//! strictly best-effort: failures are logged and swallowed, so a push problem can never fail the billing
//! operation that triggered it.

use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Client;
use serde_json::json;

use crate::errors::ServerError;

const PUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Best-effort client for the push relay. When no endpoint is configured, every send is a quiet no-op.
#[derive(Clone)]
pub struct PushGateway {
    client: Client,
    endpoint: Option<String>,
}

impl PushGateway {
    pub fn new(endpoint: Option<String>) -> Result<Self, ServerError> {
        let client =
            Client::builder().timeout(PUSH_TIMEOUT).build().map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self { client, endpoint })
    }

    /// Deliver a notification to a device. Errors are logged, never returned.
    pub async fn send(&self, device_token: &str, title: &str, body: &str) {
        let Some(endpoint) = &self.endpoint else {
            debug!("📲️ Push delivery is not configured. Dropping notification '{title}'");
            return;
        };
        let payload = json!({
            "token": device_token,
            "notification": { "title": title, "body": body },
        });
        match self.client.post(endpoint).json(&payload).send().await {
            Ok(res) if res.status().is_success() => info!("📲️ Push notification '{title}' delivered"),
            Ok(res) => warn!("📲️ Push relay rejected notification '{title}'. Status: {}", res.status()),
            Err(e) => warn!("📲️ Could not deliver push notification '{title}'. {e}"),
        }
    }
}
