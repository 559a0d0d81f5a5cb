//! Access token issuance and validation.
//!
//! Tokens are stateless HS256 JWTs carrying the user id, username and role. Clients receive a token from
//! `/auth/login` (or `/auth/register`) and present it on every `/api` call in the [`ACCESS_TOKEN_HEADER`]
//! header. The [`crate::middleware::JwtMiddlewareFactory`] validates the token and stashes the decoded
//! [`JwtClaims`] in the request extensions, where handlers pick them up via the `FromRequest` impl below.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use water_billing_engine::db_types::{ResourceId, Role, User};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

/// The request header that carries the access token on authenticated calls.
pub const ACCESS_TOKEN_HEADER: &str = "wbs_access_token";

/// The claim set embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The user id the token was issued to.
    pub sub: ResourceId,
    pub username: String,
    pub role: Role,
    /// Expiry, as a unix timestamp.
    pub exp: i64,
}

/// Handlers taking a `JwtClaims` parameter read the claims that the JWT middleware has already validated and
/// stored on the request. A missing entry means the route was mounted outside the middleware, or the client
/// never sent a token.
impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned();
        match claims {
            Some(claims) => ready(Ok(claims)),
            None => ready(Err(ServerError::AuthenticationError(AuthError::MissingToken))),
        }
    }
}

/// Issues and validates access tokens using the secret from [`AuthConfig`].
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.reveal().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry_hours: config.token_expiry_hours,
        }
    }

    /// Issue a fresh token for the given user.
    pub fn issue(&self, user: &User) -> Result<String, ServerError> {
        let exp = (Utc::now() + Duration::hours(self.token_expiry_hours)).timestamp();
        let claims = JwtClaims { sub: user.id, username: user.username.clone(), role: user.role, exp };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServerError::CouldNotSerializeAccessToken(e.to_string()))
    }

    /// Decode and validate a token, returning the claims it carries. Expired and tampered tokens are rejected.
    pub fn validate(&self, token: &str) -> Result<JwtClaims, AuthError> {
        decode::<JwtClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| AuthError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use wbs_common::Secret;

    use super::*;

    fn test_issuer() -> TokenIssuer {
        let config = AuthConfig {
            jwt_secret: Secret::new("super-secret-test-key".to_string()),
            token_expiry_hours: 1,
        };
        TokenIssuer::new(&config)
    }

    fn sample_user() -> User {
        User {
            id: ResourceId::from(42),
            username: "maria.santos".to_string(),
            role: Role::Customer,
            full_name: "Maria Santos".to_string(),
            address: None,
            purok: None,
            meter_number: None,
            phone: None,
            email: None,
            device_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn issued_tokens_round_trip() {
        let issuer = test_issuer();
        let token = issuer.issue(&sample_user()).unwrap();
        let claims = issuer.validate(&token).unwrap();
        assert_eq!(claims.sub, ResourceId::from(42));
        assert_eq!(claims.username, "maria.santos");
        assert_eq!(claims.role, Role::Customer);
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let issuer = test_issuer();
        let mut token = issuer.issue(&sample_user()).unwrap();
        token.push_str("aa");
        assert!(matches!(issuer.validate(&token), Err(AuthError::ValidationError(_))));
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let config = AuthConfig {
            jwt_secret: Secret::new("a-different-secret".to_string()),
            token_expiry_hours: 1,
        };
        let other = TokenIssuer::new(&config);
        let token = other.issue(&sample_user()).unwrap();
        assert!(issuer_rejects(&test_issuer(), &token));
    }

    fn issuer_rejects(issuer: &TokenIssuer, token: &str) -> bool {
        matches!(issuer.validate(token), Err(AuthError::ValidationError(_)))
    }
}
