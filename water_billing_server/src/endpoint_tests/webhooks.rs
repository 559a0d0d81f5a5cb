//! Tests for the `/webhooks/paymongo` endpoint.
//!
//! The HMAC middleware is part of the contract here, so these tests mount the route inside a `/webhooks`
//! scope exactly the way the server does and sign (or mis-sign) the raw body themselves. Whatever happens
//! past the signature check, the gateway must see a 200.

use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use log::debug;
use water_billing_engine::{
    db_types::{PaymentMethod, ResourceId},
    events::EventProducers,
    traits::BillingError,
    BillingFlowApi,
};
use wbs_common::Secret;

use super::mocks::{payment_for, settled, unpaid_bill, MockBillingBackend};
use crate::{
    config::ServerOptions,
    helpers::calculate_hmac,
    middleware::HmacMiddlewareFactory,
    paymongo_routes::PaymongoWebhookRoute,
    server::PAYMONGO_SIGNATURE_HEADER,
};

const WEBHOOK_SECRET: &str = "whsec_endpoint_test";

#[actix_web::test]
async fn unsigned_deliveries_are_rejected() {
    let _ = env_logger::try_init().ok();
    let err = deliver(SUCCESS_EVENT, None, true, configure_never_settles).await.expect_err("Expected error");
    assert_eq!(err, "No HMAC signature found.");
}

#[actix_web::test]
async fn badly_signed_deliveries_are_rejected() {
    let _ = env_logger::try_init().ok();
    let signature = calculate_hmac("whsec_wrong_secret", SUCCESS_EVENT.as_bytes());
    let err =
        deliver(SUCCESS_EVENT, Some(&signature), true, configure_never_settles).await.expect_err("Expected error");
    assert_eq!(err, "Invalid HMAC signature.");
}

#[actix_web::test]
async fn signed_delivery_settles_the_bill() {
    let _ = env_logger::try_init().ok();
    let signature = calculate_hmac(WEBHOOK_SECRET, SUCCESS_EVENT.as_bytes());
    let (status, body) =
        deliver(SUCCESS_EVENT, Some(&signature), true, configure_settles).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Payment recorded."}"#);
}

// A redelivery, or a delivery that lost the race against the attach response, is still a 200.
#[actix_web::test]
async fn second_delivery_records_nothing() {
    let _ = env_logger::try_init().ok();
    let signature = calculate_hmac(WEBHOOK_SECRET, SUCCESS_EVENT.as_bytes());
    let (status, body) =
        deliver(SUCCESS_EVENT, Some(&signature), true, configure_already_settled).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Bill already settled."}"#);
}

#[actix_web::test]
async fn other_event_types_are_acknowledged() {
    let _ = env_logger::try_init().ok();
    let signature = calculate_hmac(WEBHOOK_SECRET, FAILED_EVENT.as_bytes());
    let (status, body) =
        deliver(FAILED_EVENT, Some(&signature), true, configure_never_settles).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Event payment.failed acknowledged."}"#);
}

#[actix_web::test]
async fn payments_without_a_bill_reference_are_flagged() {
    let _ = env_logger::try_init().ok();
    let signature = calculate_hmac(WEBHOOK_SECRET, UNRELATED_PAYMENT_EVENT.as_bytes());
    let (status, body) = deliver(UNRELATED_PAYMENT_EVENT, Some(&signature), true, configure_never_settles)
        .await
        .expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":false,"message":"No bill reference in the payment description."}"#);
}

#[actix_web::test]
async fn unknown_bill_references_are_flagged() {
    let _ = env_logger::try_init().ok();
    let signature = calculate_hmac(WEBHOOK_SECRET, SUCCESS_EVENT.as_bytes());
    let (status, body) =
        deliver(SUCCESS_EVENT, Some(&signature), true, configure_bill_missing).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":false,"message":"Bill #42 does not exist."}"#);
}

// Local development runs with `WBS_PAYMONGO_HMAC_CHECKS=0` and no signatures at all.
#[actix_web::test]
async fn signature_checks_can_be_disabled() {
    let _ = env_logger::try_init().ok();
    let (status, body) = deliver(SUCCESS_EVENT, None, false, configure_settles).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Payment recorded."}"#);
}

fn configure_settles(cfg: &mut ServiceConfig) {
    let mut backend = MockBillingBackend::new();
    backend
        .expect_settle_bill()
        .withf(|settlement| {
            settlement.bill_id == ResourceId::from(42) &&
                settlement.method == PaymentMethod::GCash &&
                settlement.gateway_ref.as_deref() == Some("pay_XWnYCr3Tdj3kBiZviXawWders")
        })
        .returning(|settlement| {
            let bill = unpaid_bill(42, 9);
            let payment = payment_for(&bill, settlement.method);
            Ok((settled(bill), payment))
        });
    register(cfg, backend);
}

fn configure_already_settled(cfg: &mut ServiceConfig) {
    let mut backend = MockBillingBackend::new();
    backend.expect_settle_bill().returning(|s| Err(BillingError::BillAlreadySettled(s.bill_id)));
    register(cfg, backend);
}

fn configure_bill_missing(cfg: &mut ServiceConfig) {
    let mut backend = MockBillingBackend::new();
    backend.expect_settle_bill().returning(|s| Err(BillingError::BillNotFound(s.bill_id)));
    register(cfg, backend);
}

fn configure_never_settles(cfg: &mut ServiceConfig) {
    let mut backend = MockBillingBackend::new();
    backend.expect_settle_bill().never();
    register(cfg, backend);
}

fn register(cfg: &mut ServiceConfig, backend: MockBillingBackend) {
    let api = BillingFlowApi::new(backend, EventProducers::default());
    cfg.app_data(web::Data::new(api)).app_data(web::Data::new(ServerOptions::default()));
}

async fn deliver(
    body: &str,
    signature: Option<&str>,
    hmac_checks: bool,
    configure: fn(&mut ServiceConfig),
) -> Result<(StatusCode, String), String> {
    let mut req = TestRequest::post()
        .uri("/webhooks/paymongo")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(body.to_string());
    if let Some(signature) = signature {
        req = req.insert_header((PAYMONGO_SIGNATURE_HEADER, signature));
    }
    let req = req.to_request();
    let webhook_scope = web::scope("/webhooks")
        .wrap(HmacMiddlewareFactory::new(PAYMONGO_SIGNATURE_HEADER, Secret::new(WEBHOOK_SECRET.to_string()), hmac_checks))
        .service(PaymongoWebhookRoute::<MockBillingBackend>::new());
    let app = App::new().configure(configure).service(webhook_scope);
    let service = test::init_service(app).await;
    debug!("Delivering webhook");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}

const SUCCESS_EVENT: &str = r#"{
  "data": {
    "id": "evt_Jkkh7sBfDUzWVZzhhBN4zbSE",
    "type": "event",
    "attributes": {
      "type": "payment.success",
      "livemode": false,
      "data": {
        "id": "pay_XWnYCr3Tdj3kBiZviXawWders",
        "type": "payment",
        "attributes": {
          "amount": 45000,
          "currency": "PHP",
          "description": "Water bill payment for bill_id:42",
          "source": { "id": "src_64EY6sQbYvGCTUZcRKnSGBzo", "type": "gcash" }
        }
      }
    }
  }
}"#;

const FAILED_EVENT: &str = r#"{
  "data": {
    "id": "evt_8cuHfGzUhYYcxCSVYywpVBjM",
    "type": "event",
    "attributes": {
      "type": "payment.failed",
      "livemode": false,
      "data": {
        "id": "pay_hE4Cv5svR92KkxErrAHxp9KT",
        "type": "payment",
        "attributes": {
          "amount": 45000,
          "currency": "PHP",
          "description": "Water bill payment for bill_id:42",
          "source": { "id": "src_hXYvGCTUZcRKnSGBzo64EY6sQb", "type": "gcash" }
        }
      }
    }
  }
}"#;

const UNRELATED_PAYMENT_EVENT: &str = r#"{
  "data": {
    "id": "evt_mLkCvnwmmqeZBZF8HUzWVZzh",
    "type": "event",
    "attributes": {
      "type": "payment.success",
      "livemode": false,
      "data": {
        "id": "pay_uNs1G3EqeZBZF8HMsAYE3nWB",
        "type": "payment",
        "attributes": {
          "amount": 20000,
          "currency": "PHP",
          "description": "GCash wallet top-up",
          "source": { "id": "src_RKnSGBzo64EY6sQbYvGCTUZc", "type": "gcash" }
        }
      }
    }
  }
}"#;
