use log::*;
use wbs_common::Secret;

pub const DEFAULT_PAYMONGO_API_URL: &str = "https://api.paymongo.com/v1";

#[derive(Debug, Clone, Default)]
pub struct PayMongoConfig {
    pub api_url: String,
    /// The secret key. Sent as the basic-auth username with an empty password.
    pub secret_key: Secret<String>,
    /// Where the gateway redirects the payer after 3DS or e-wallet authorization.
    pub return_url: String,
}

impl PayMongoConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("WBS_PAYMONGO_API_URL").unwrap_or_else(|_| {
            debug!("WBS_PAYMONGO_API_URL not set, using {DEFAULT_PAYMONGO_API_URL}");
            DEFAULT_PAYMONGO_API_URL.to_string()
        });
        let secret_key = Secret::new(std::env::var("WBS_PAYMONGO_SECRET_KEY").unwrap_or_else(|_| {
            warn!("WBS_PAYMONGO_SECRET_KEY not set, using (probably useless) default");
            "sk_test_00000000000000".to_string()
        }));
        let return_url = std::env::var("WBS_PAYMONGO_RETURN_URL").unwrap_or_else(|_| {
            warn!("WBS_PAYMONGO_RETURN_URL not set, using (probably useless) default");
            "http://localhost:3000/success".to_string()
        });
        Self { api_url, secret_key, return_url }
    }
}
