use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use log::debug;
use serde::Serialize;
use water_billing_engine::db_types::{ResourceId, Role};
use wbs_common::Secret;

use crate::{
    auth::{JwtClaims, TokenIssuer, ACCESS_TOKEN_HEADER},
    config::AuthConfig,
    middleware::JwtMiddlewareFactory,
};

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: Secret::new("925842e11914fdd0c9a2ab8a38dac9de57b3e392372cde1661b1a84b1d8e430e".to_string()),
        token_expiry_hours: 24,
    }
}

/// Signs an arbitrary claim set with the test secret. This goes through `jsonwebtoken` directly rather than
/// [`TokenIssuer::issue`] so that tests can mint expired tokens and tokens for users that do not exist.
pub fn issue_token(claims: &JwtClaims) -> String {
    let config = get_auth_config();
    let key = EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
    encode(&Header::default(), claims, &key).expect("Failed to sign token")
}

/// A claim set for the given user that expires tomorrow.
pub fn valid_claims(user_id: i64, role: Role) -> JwtClaims {
    JwtClaims {
        sub: ResourceId::from(user_id),
        username: format!("user{user_id}"),
        role,
        exp: (Utc::now() + Duration::days(1)).timestamp(),
    }
}

pub async fn get_request(
    auth_header: &str,
    path: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = TestRequest::get().uri(path);
    send_request(req, auth_header, configure).await
}

pub async fn post_request<T: Serialize>(
    auth_header: &str,
    path: &str,
    body: &T,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let req = TestRequest::post().uri(path).set_json(body);
    send_request(req, auth_header, configure).await
}

/// Runs the request against an app with the access token middleware in place, mimicking the `/api` scope of
/// the real server. Requests the middleware rejects come back as `Err` with the rejection message; anything
/// that reached a handler comes back as `Ok` with the status and body.
async fn send_request(
    mut req: TestRequest,
    auth_header: &str,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    if !auth_header.is_empty() {
        req = req.insert_header((ACCESS_TOKEN_HEADER, auth_header));
    }
    let req = req.to_request();
    let issuer = TokenIssuer::new(&get_auth_config());
    let app = App::new().wrap(JwtMiddlewareFactory::new(issuer)).configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}
