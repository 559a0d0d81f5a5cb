use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{Duration, TimeZone, Utc};
use log::debug;
use water_billing_engine::{
    db_types::{Bill, MeterReading, NewMeterReading, ResourceId, Role},
    events::EventProducers,
    AccountApi,
    BillingFlowApi,
};
use wbs_common::Centavos;

use super::{
    helpers::{get_request, issue_token, post_request, valid_claims},
    mocks::{current_settings, customer, MockAccountManager, MockBillingBackend},
};
use crate::routes::{IngestReadingRoute, ReadingsForUserRoute};

#[actix_web::test]
async fn submit_reading_without_a_token() {
    let _ = env_logger::try_init().ok();
    let body = NewMeterReading::new(ResourceId::from(42), 140.0);
    let err = post_request("", "/readings", &body, configure_submit).await.expect_err("Expected error");
    assert_eq!(err, "An access token is required.");
}

#[actix_web::test]
async fn submit_reading_with_an_expired_token() {
    let _ = env_logger::try_init().ok();
    let mut claims = valid_claims(8, Role::MeterReader);
    claims.exp = (Utc::now() - Duration::days(1)).timestamp();
    let token = issue_token(&claims);
    debug!("Calling /readings with expired token {claims:?}");
    let body = NewMeterReading::new(ResourceId::from(42), 140.0);
    let err = post_request(&token, "/readings", &body, configure_submit).await.expect_err("Expected error");
    assert_eq!(err, "Access token is invalid or expired.");
}

// Only field workers and staff may capture readings.
#[actix_web::test]
async fn customers_cannot_submit_readings() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&valid_claims(42, Role::Customer));
    let body = NewMeterReading::new(ResourceId::from(42), 140.0);
    let err = post_request(&token, "/readings", &body, configure_submit).await.expect_err("Expected error");
    assert_eq!(err, "Insufficient permissions");
}

#[actix_web::test]
async fn meter_reader_submits_a_reading() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&valid_claims(8, Role::MeterReader));
    let body = NewMeterReading::new(ResourceId::from(42), 140.0);
    let (status, body) = post_request(&token, "/readings", &body, configure_submit).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, READING_WITH_BILL_JSON);
}

#[actix_web::test]
async fn customers_fetch_their_own_readings() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&valid_claims(42, Role::Customer));
    let (status, body) = get_request(&token, "/readings/42", configure_history).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, READINGS_JSON);
}

#[actix_web::test]
async fn customers_cannot_fetch_another_users_readings() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&valid_claims(42, Role::Customer));
    let (status, body) = get_request(&token, "/readings/99", configure_history).await.expect("Request failed");
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, r#"{"error":"Insufficient Permissions. You can only view your own records"}"#);
}

#[actix_web::test]
async fn meter_readers_can_fetch_anyones_readings() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(&valid_claims(8, Role::MeterReader));
    let (status, body) = get_request(&token, "/readings/42", configure_history).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, READINGS_JSON);
}

fn configure_submit(cfg: &mut ServiceConfig) {
    let mut backend = MockBillingBackend::new();
    backend.expect_fetch_settings().returning(|| Ok(current_settings()));
    backend
        .expect_process_new_reading()
        .withf(|reading, _| reading.user_id == ResourceId::from(42) && reading.reading_value == 140.0)
        .returning(|_, _| Ok((july_reading(), july_bill())));
    let api = BillingFlowApi::new(backend, EventProducers::default());
    cfg.service(IngestReadingRoute::<MockBillingBackend>::new()).app_data(web::Data::new(api));
}

fn configure_history(cfg: &mut ServiceConfig) {
    let mut account_manager = MockAccountManager::new();
    account_manager.expect_fetch_user_by_id().returning(|id| Ok(Some(customer(id.value()))));
    account_manager.expect_fetch_readings_for_user().returning(|_| Ok(vec![july_reading(), june_reading()]));
    let accounts_api = AccountApi::new(account_manager);
    cfg.service(ReadingsForUserRoute::<MockAccountManager>::new()).app_data(web::Data::new(accounts_api));
}

// 40 m³ priced at the default ₱10/m³ tariff.
fn july_reading() -> MeterReading {
    MeterReading {
        id: ResourceId::from(7),
        user_id: ResourceId::from(42),
        reading_value: 140.0,
        photo_url: None,
        reading_date: Utc.with_ymd_and_hms(2026, 7, 1, 8, 0, 0).unwrap(),
        created_at: Utc.with_ymd_and_hms(2026, 7, 1, 8, 0, 0).unwrap(),
    }
}

fn june_reading() -> MeterReading {
    MeterReading {
        id: ResourceId::from(3),
        user_id: ResourceId::from(42),
        reading_value: 100.0,
        photo_url: None,
        reading_date: Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap(),
        created_at: Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap(),
    }
}

fn july_bill() -> Bill {
    Bill {
        id: ResourceId::from(55),
        user_id: ResourceId::from(42),
        reading_id: ResourceId::from(7),
        consumption: 40.0,
        amount_due: Centavos::from_pesos(450),
        due_date: Utc.with_ymd_and_hms(2026, 7, 16, 8, 0, 0).unwrap(),
        is_paid: false,
        created_at: Utc.with_ymd_and_hms(2026, 7, 1, 8, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2026, 7, 1, 8, 0, 0).unwrap(),
    }
}

const READING_WITH_BILL_JSON: &str = r#"{"reading":{"id":"7","user_id":"42","reading_value":140.0,"photo_url":null,"reading_date":"2026-07-01T08:00:00Z","created_at":"2026-07-01T08:00:00Z"},"bill":{"id":"55","user_id":"42","reading_id":"7","consumption":40.0,"amount_due":45000,"due_date":"2026-07-16T08:00:00Z","is_paid":false,"created_at":"2026-07-01T08:00:00Z","updated_at":"2026-07-01T08:00:00Z"}}"#;

const READINGS_JSON: &str = r#"[{"id":"7","user_id":"42","reading_value":140.0,"photo_url":null,"reading_date":"2026-07-01T08:00:00Z","created_at":"2026-07-01T08:00:00Z"},{"id":"3","user_id":"42","reading_value":100.0,"photo_url":null,"reading_date":"2026-06-01T08:00:00Z","created_at":"2026-06-01T08:00:00Z"}]"#;
