use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::PayMongoConfig,
    data_objects::{AttachPaymentMethod, Envelope, NewPaymentIntent, PaymentIntent},
    PayMongoApiError,
};

/// A settlement flow must never hang on the gateway. Calls that exceed this are surfaced as request errors.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// REST client for the PayMongo payment-intent API.
///
/// Authentication is HTTP basic with the secret key as the username and an empty password, on every request.
#[derive(Clone)]
pub struct PayMongoApi {
    config: PayMongoConfig,
    client: Arc<Client>,
}

impl PayMongoApi {
    pub fn new(config: PayMongoConfig) -> Result<Self, PayMongoApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PayMongoApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, PayMongoApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req =
            self.client.request(method, url).basic_auth(self.config.secret_key.reveal(), Some(""));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| PayMongoApiError::RestRequestError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| PayMongoApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| PayMongoApiError::RestResponseError(e.to_string()))?;
            Err(PayMongoApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    /// The URL the gateway redirects the payer back to after 3DS / e-wallet authorization.
    pub fn return_url(&self) -> &str {
        &self.config.return_url
    }

    /// Creates a payment intent for the given amount and returns it, client key included.
    pub async fn create_payment_intent(&self, intent: NewPaymentIntent) -> Result<PaymentIntent, PayMongoApiError> {
        debug!("Creating a payment intent for {}", intent.amount);
        let body = Envelope::wrap(intent);
        let result =
            self.rest_query::<Envelope<PaymentIntent>, _>(Method::POST, "/payment_intents", Some(body)).await?;
        info!("Created payment intent {}", result.data.id);
        Ok(result.data)
    }

    /// Attaches a payment method to an intent and returns the updated intent. A status of `succeeded` on the
    /// result means the payment completed synchronously.
    pub async fn attach_payment_method(
        &self,
        intent_id: &str,
        attach: AttachPaymentMethod,
    ) -> Result<PaymentIntent, PayMongoApiError> {
        debug!("Attaching payment method to intent {intent_id}");
        let path = format!("/payment_intents/{intent_id}/attach");
        let body = Envelope::wrap(attach);
        let result = self.rest_query::<Envelope<PaymentIntent>, _>(Method::POST, &path, Some(body)).await?;
        info!("Payment method attached to intent {intent_id}. Status: {}", result.data.attributes.status);
        Ok(result.data)
    }

    /// Fetches the current state of a payment intent.
    pub async fn get_payment_intent(&self, intent_id: &str) -> Result<PaymentIntent, PayMongoApiError> {
        debug!("Fetching payment intent {intent_id}");
        let path = format!("/payment_intents/{intent_id}");
        let result = self.rest_query::<Envelope<PaymentIntent>, ()>(Method::GET, &path, None).await?;
        Ok(result.data)
    }
}
