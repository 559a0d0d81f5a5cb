use std::{env, io::Write};

use log::*;
use paymongo_tools::PayMongoConfig;
use rand::{thread_rng, Rng};
use serde_json::json;
use tempfile::NamedTempFile;
use wbs_common::{parse_boolean_flag, Secret};

use crate::errors::ServerError;

const DEFAULT_WBS_HOST: &str = "127.0.0.1";
const DEFAULT_WBS_PORT: u16 = 4000;
const DEFAULT_TOKEN_EXPIRY_HOURS: i64 = 24;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
    /// Payment gateway configuration
    pub paymongo: PayMongoServerConfig,
    /// Where device push notifications get POSTed. Unset disables push delivery.
    pub push_endpoint: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_WBS_HOST.to_string(),
            port: DEFAULT_WBS_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            use_x_forwarded_for: false,
            use_forwarded: false,
            paymongo: PayMongoServerConfig::default(),
            push_endpoint: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("WBS_HOST").ok().unwrap_or_else(|| DEFAULT_WBS_HOST.into());
        let port = env::var("WBS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for WBS_PORT. {e} Using the default, {DEFAULT_WBS_PORT}, instead."
                    );
                    DEFAULT_WBS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_WBS_PORT);
        let database_url = env::var("WBS_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ WBS_DATABASE_URL is not set. Please set it to the URL for the billing database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to \
                 the default configuration."
            );
            AuthConfig::default()
        });
        let paymongo = PayMongoServerConfig::from_env_or_defaults();
        let use_x_forwarded_for = parse_boolean_flag(env::var("WBS_USE_X_FORWARDED_FOR").ok(), false);
        let use_forwarded = parse_boolean_flag(env::var("WBS_USE_FORWARDED").ok(), false);
        let push_endpoint = env::var("WBS_PUSH_ENDPOINT").ok();
        if push_endpoint.is_none() {
            info!("🪛️ WBS_PUSH_ENDPOINT is not set. Device push delivery is disabled for this session.");
        }
        Self { host, port, database_url, auth, use_x_forwarded_for, use_forwarded, paymongo, push_endpoint }
    }
}

//---------------------------------------  PayMongoServerConfig  ------------------------------------------------------

/// Everything the server needs to talk to, and be talked to by, the payment gateway: the REST client
/// configuration for outbound calls, and the shared secret for verifying inbound webhook signatures.
#[derive(Clone, Debug, Default)]
pub struct PayMongoServerConfig {
    pub api: PayMongoConfig,
    /// Shared secret for the webhook HMAC signature.
    pub webhook_secret: Secret<String>,
    /// If false, webhook signature checks are skipped entirely. Never disable this in production.
    pub hmac_checks: bool,
}

impl PayMongoServerConfig {
    pub fn from_env_or_defaults() -> Self {
        let api = PayMongoConfig::new_from_env_or_default();
        let webhook_secret = env::var("WBS_PAYMONGO_WEBHOOK_SECRET").ok().unwrap_or_else(|| {
            error!(
                "🪛️ WBS_PAYMONGO_WEBHOOK_SECRET is not set. Please set it to the shared secret for the gateway's \
                 webhook signatures."
            );
            String::default()
        });
        let webhook_secret = Secret::new(webhook_secret);
        let hmac_checks = parse_boolean_flag(env::var("WBS_PAYMONGO_HMAC_CHECKS").ok(), true);
        if !hmac_checks {
            warn!(
                "🚨️ Webhook HMAC checks are disabled. Anyone who can reach this server can fabricate settlement \
                 notices. Set WBS_PAYMONGO_HMAC_CHECKS=1 on production instances."
            );
        }
        Self { api, webhook_secret, hmac_checks }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------

#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The secret used to sign and verify access tokens (HMAC-SHA256).
    pub jwt_secret: Secret<String>,
    /// How long an issued access token stays valid, in hours. Tokens do not refresh.
    pub token_expiry_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. DO NOT \
             operate on production like this since all issued tokens die with the process. 🚨️🚨️🚨️"
        );
        let mut rng = thread_rng();
        let bytes: [u8; 32] = rng.gen();
        let secret = bytes.iter().map(|b| format!("{b:02x}")).collect::<String>();
        match &mut tmpfile {
            Some((f, p)) => {
                let key_data = json!({ "jwt_secret": secret }).to_string();
                match writeln!(f, "{key_data}") {
                    Ok(()) => warn!(
                        "🚨️🚨️🚨️ The JWT signing secret for this session was written to {}. If this is a production \
                         instance, you are doing it wrong! Set the WBS_JWT_SECRET environment variable instead. \
                         🚨️🚨️🚨️",
                        p.to_str().unwrap_or("???")
                    ),
                    Err(e) => warn!("🪛️ Could not write the JWT signing secret to the temporary file. {e}"),
                }
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT signing secret.");
            },
        }
        Self { jwt_secret: Secret::new(secret), token_expiry_hours: DEFAULT_TOKEN_EXPIRY_HOURS }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let jwt_secret =
            env::var("WBS_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [WBS_JWT_SECRET]")))?;
        if jwt_secret.trim().is_empty() {
            return Err(ServerError::ConfigurationError("WBS_JWT_SECRET is empty".to_string()));
        }
        let token_expiry_hours = match env::var("WBS_JWT_EXPIRY_HOURS") {
            Ok(s) => s.parse::<i64>().map_err(|e| {
                ServerError::ConfigurationError(format!("Invalid value for WBS_JWT_EXPIRY_HOURS: {e}"))
            })?,
            Err(_) => DEFAULT_TOKEN_EXPIRY_HOURS,
        };
        Ok(Self { jwt_secret: Secret::new(jwt_secret), token_expiry_hours })
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------

/// A subset of the server configuration that is used to configure the server's behaviour. Generally we try to
/// keep this as small as possible, and exclude secrets to avoid passing sensitive information around the system.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerOptions {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { use_x_forwarded_for: config.use_x_forwarded_for, use_forwarded: config.use_forwarded }
    }
}
