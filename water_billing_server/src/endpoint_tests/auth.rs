//! Tests for `/auth/register` and `/auth/login`.
//!
//! These routes live outside the access-token middleware, so each test builds a bespoke app with just the
//! route under test and mocked backends.

use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use log::*;
use serde::Serialize;
use serde_json::json;
use water_billing_engine::{
    db_types::{NewUser, ResourceId, Role, User, UserCredentials},
    traits::AuthApiError,
    AccountApi,
    AuthApi,
};

use super::{helpers::get_auth_config, mocks::*};
use crate::{
    auth::TokenIssuer,
    data_objects::LoginResponse,
    routes::{LoginRoute, RegisterRoute},
};

#[actix_web::test]
async fn register_new_customer() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "username": "maria.santos",
        "password": "hunter2",
        "full_name": "Maria Santos",
        "purok": "Riverside"
    });
    let configure = |cfg: &mut ServiceConfig| {
        let mut auth_manager = MockAuthManager::new();
        auth_manager
            .expect_create_user()
            .withf(|user| {
                user.username == "maria.santos" &&
                    user.role == Role::Customer &&
                    verify("hunter2", &user.password_hash).unwrap_or(false)
            })
            .returning(|user| Ok(materialize(user)));
        let auth_api = AuthApi::new(auth_manager);
        let jwt_signer = TokenIssuer::new(&get_auth_config());
        cfg.app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(jwt_signer))
            .service(RegisterRoute::<MockAuthManager>::new());
    };
    let (status, body) = post_json("/register", &body, configure).await;
    assert_eq!(status, StatusCode::OK);
    let res = serde_json::from_str::<LoginResponse>(&body).expect("Invalid response body");
    assert_eq!(res.user.id, ResourceId::from(101));
    assert_eq!(res.user.role, Role::Customer);
    // The token in the response must be usable straight away.
    let claims = TokenIssuer::new(&get_auth_config()).validate(&res.token).expect("Token did not validate");
    assert_eq!(claims.sub, ResourceId::from(101));
    assert_eq!(claims.username, "maria.santos");
    assert_eq!(claims.role, Role::Customer);
}

#[actix_web::test]
async fn register_duplicate_username() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "username": "maria.santos", "password": "hunter2", "full_name": "Maria Santos" });
    let (status, body) = post_json("/register", &body, register_app(Err(AuthApiError::UsernameTaken))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, r#"{"error":"The request conflicts with the records. Username is already taken"}"#);
}

#[actix_web::test]
async fn register_requires_a_username_and_password() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "username": "  ", "password": "hunter2", "full_name": "Maria Santos" });
    let (status, body) = post_json("/register", &body, register_app(Ok(materialize_blank()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, r#"{"error":"Could not read request body: A username and password are required"}"#);
}

#[actix_web::test]
async fn login_with_the_wrong_password() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "username": "maria.santos", "password": "letmein" });
    let (status, body) = post_json("/login", &body, login_app(Ok(stored_credentials()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. Invalid username or password."}"#);
}

// Unknown usernames and wrong passwords must be indistinguishable to the caller.
#[actix_web::test]
async fn login_with_an_unknown_username() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "username": "nobody", "password": "hunter2" });
    let (status, body) = post_json("/login", &body, login_app(Err(AuthApiError::UserNotFound))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, r#"{"error":"Authentication Error. Invalid username or password."}"#);
}

#[actix_web::test]
async fn login_with_valid_credentials() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "username": "maria.santos", "password": "hunter2" });
    let (status, body) = post_json("/login", &body, login_app(Ok(stored_credentials()))).await;
    assert_eq!(status, StatusCode::OK);
    let res = serde_json::from_str::<LoginResponse>(&body).expect("Invalid response body");
    assert_eq!(res.user.username, "maria.santos");
    let claims = TokenIssuer::new(&get_auth_config()).validate(&res.token).expect("Token did not validate");
    assert_eq!(claims.sub, ResourceId::from(42));
    assert_eq!(claims.role, Role::Customer);
    let hours_left = claims.exp - Utc::now().timestamp();
    assert!(hours_left > Duration::hours(23).num_seconds(), "Expiry: {hours_left}s");
}

fn register_app(create_result: Result<User, AuthApiError>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let mut auth_manager = MockAuthManager::new();
        auth_manager.expect_create_user().return_once(move |_| create_result);
        let auth_api = AuthApi::new(auth_manager);
        let jwt_signer = TokenIssuer::new(&get_auth_config());
        cfg.app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(jwt_signer))
            .service(RegisterRoute::<MockAuthManager>::new());
    }
}

fn login_app(credentials_result: Result<UserCredentials, AuthApiError>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        let mut auth_manager = MockAuthManager::new();
        auth_manager.expect_fetch_credentials().return_once(move |_| credentials_result);
        let mut account_manager = MockAccountManager::new();
        account_manager.expect_fetch_user_by_id().returning(|id| {
            let mut user = customer(42);
            user.id = id;
            user.username = "maria.santos".to_string();
            Ok(Some(user))
        });
        let auth_api = AuthApi::new(auth_manager);
        let accounts_api = AccountApi::new(account_manager);
        let jwt_signer = TokenIssuer::new(&get_auth_config());
        cfg.app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(jwt_signer))
            .service(LoginRoute::<MockAuthManager, MockAccountManager>::new());
    }
}

async fn post_json<T, F>(path: &str, body: &T, configure: F) -> (StatusCode, String)
where
    T: Serialize,
    F: FnOnce(&mut ServiceConfig),
{
    let req = TestRequest::post().uri(path).set_json(body).to_request();
    let app = App::new().configure(configure);
    let app = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::call_service(&app, req).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

fn materialize(user: NewUser) -> User {
    User {
        id: ResourceId::from(101),
        username: user.username,
        role: user.role,
        full_name: user.full_name,
        address: user.address,
        purok: user.purok,
        meter_number: user.meter_number,
        phone: user.phone,
        email: user.email,
        device_token: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn materialize_blank() -> User {
    materialize(NewUser::new("", "", Role::Customer))
}

fn stored_credentials() -> UserCredentials {
    // Minimum bcrypt cost. These tests only care that verification happens, not that it is slow.
    let password_hash = hash("hunter2", 4).unwrap();
    UserCredentials { id: ResourceId::from(42), username: "maria.santos".to_string(), password_hash, role: Role::Customer }
}
