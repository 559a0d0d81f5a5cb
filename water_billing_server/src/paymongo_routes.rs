//! Payment gateway endpoints.
//!
//! Bills can be paid online through PayMongo's payment-intent flow. The client calls
//! `POST /api/checkout` to open an intent for a bill, drives the e-wallet / 3DS authorization itself using
//! the returned client key, then confirms via `POST /api/checkout/attach`. Settlement happens either
//! synchronously (the attach response says `succeeded`) or asynchronously through the
//! `POST /webhooks/paymongo` endpoint, and frequently through *both*: the guarded settlement in the engine
//! makes sure that whichever trigger arrives second records nothing.
//!
//! The webhook route sits behind the HMAC middleware, so by the time the handler runs the signature has
//! already been checked. Webhook responses are always in the 200 range; a non-2xx makes the gateway retry
//! the delivery, which is never what we want for a body we have already inspected.

use actix_web::{web, HttpRequest, HttpResponse};
use log::*;
use paymongo_tools::{
    data_objects::EVENT_PAYMENT_SUCCESS,
    AttachPaymentMethod,
    NewPaymentIntent,
    PayMongoApi,
    WebhookEvent,
};
use water_billing_engine::{
    db_types::PaymentMethod,
    helpers::extract_bill_id_from_description,
    traits::{AccountManagement, BillSettlement, BillingDatabase, BillingError},
    AccountApi,
    BillingFlowApi,
};

use crate::{
    auth::JwtClaims,
    config::ServerOptions,
    data_objects::{AttachRequest, AttachResponse, CheckoutRequest, JsonResponse},
    errors::ServerError,
    helpers::get_remote_ip,
    route,
    routes::assert_can_view,
};

route!(checkout => Post "/checkout" impl AccountManagement);
/// Route handler for opening a gateway checkout for a bill
///
/// The amount always comes from the bill's outstanding balance; the client has no say in it. The intent
/// description embeds the bill reference so that the webhook can find its way back to the bill without any
/// shared state. Settled bills are rejected with a 409 before the gateway is ever contacted.
pub async fn checkout<B: AccountManagement>(
    claims: JwtClaims,
    body: web::Json<CheckoutRequest>,
    accounts: web::Data<AccountApi<B>>,
    gateway: web::Data<PayMongoApi>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💳️ POST checkout for bill {}", req.bill_id);
    let bill = accounts
        .bill_by_id(req.bill_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Bill #{} does not exist", req.bill_id)))?;
    assert_can_view(&claims, bill.user_id)?;
    if bill.is_paid {
        debug!("💳️ Bill #{} is already settled. Not opening an intent.", bill.id);
        return Err(ServerError::Conflict(format!("Bill #{} has already been settled", bill.id)));
    }
    let description = format!("Water bill payment for bill_id:{}", bill.id);
    let mut intent = NewPaymentIntent::new(bill.amount_due, description);
    if let Some(methods) = req.payment_methods {
        intent = intent.with_methods(methods);
    }
    let intent = gateway.create_payment_intent(intent).await?;
    info!("💳️ Payment intent {} opened for bill #{} ({})", intent.id, bill.id, bill.amount_due);
    Ok(HttpResponse::Ok().json(intent))
}

route!(attach_payment => Post "/checkout/attach" impl BillingDatabase);
/// Route handler for confirming a gateway payment
///
/// Attaches the tokenized payment method to the intent. When the gateway reports the intent as `succeeded`
/// right away, the bill is settled here and the payment record rides back in the response. When it does not
/// (3DS redirect, processing), the client follows `next_action` and the webhook finishes the job later.
///
/// If the webhook got in first, the settlement attempt comes back as "already settled". That is a win, not
/// an error: the payer's money arrived, so the response simply carries the intent without a fresh payment
/// record.
pub async fn attach_payment<B: BillingDatabase>(
    claims: JwtClaims,
    body: web::Json<AttachRequest>,
    accounts: web::Data<AccountApi<B>>,
    api: web::Data<BillingFlowApi<B>>,
    gateway: web::Data<PayMongoApi>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💳️ POST attach payment method to intent {} for bill {}", req.payment_intent_id, req.bill_id);
    let bill = accounts
        .bill_by_id(req.bill_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Bill #{} does not exist", req.bill_id)))?;
    assert_can_view(&claims, bill.user_id)?;
    let mut attach = AttachPaymentMethod::new(req.payment_method_id.as_str(), gateway.return_url());
    if let Some(client_key) = req.client_key {
        attach = attach.with_client_key(client_key);
    }
    let intent = gateway.attach_payment_method(&req.payment_intent_id, attach).await?;
    if !intent.is_succeeded() {
        debug!("💳️ Intent {} is not settled yet. Status: {}", intent.id, intent.attributes.status);
        return Ok(HttpResponse::Ok().json(AttachResponse { payment_intent: intent, payment: None }));
    }
    let settlement = BillSettlement::new(req.bill_id, req.method).with_gateway_ref(intent.id.as_str());
    let payment = match api.settle_bill(settlement).await {
        Ok((bill, payment)) => {
            info!("💳️ Bill #{} settled through intent {}. Payment #{} recorded.", bill.id, intent.id, payment.id);
            Some(payment)
        },
        Err(BillingError::BillAlreadySettled(id)) => {
            info!("💳️ Bill #{id} was already settled when intent {} succeeded. Nothing recorded.", intent.id);
            None
        },
        Err(e) => return Err(e.into()),
    };
    Ok(HttpResponse::Ok().json(AttachResponse { payment_intent: intent, payment }))
}

route!(paymongo_webhook => Post "/paymongo" impl BillingDatabase);
/// Route handler for gateway webhook deliveries
///
/// Only `payment.success` events do anything; every other event type is acknowledged and dropped. The bill
/// is located through the `bill_id:<digits>` reference that the checkout handler planted in the intent
/// description, and settled through the same guarded path as every other trigger, so a delivery that races
/// the attach response (or a redelivery of the same event) records nothing the second time.
pub async fn paymongo_webhook<B: BillingDatabase>(
    req: HttpRequest,
    body: web::Json<WebhookEvent>,
    api: web::Data<BillingFlowApi<B>>,
    options: web::Data<ServerOptions>,
) -> HttpResponse {
    trace!("💳️ Received webhook request: {}", req.uri());
    let peer_addr = get_remote_ip(&req, options.use_x_forwarded_for, options.use_forwarded);
    debug!("💳️ Webhook delivery from {peer_addr:?}");
    let event = body.into_inner();
    let event_type = event.event_type();
    if event_type != EVENT_PAYMENT_SUCCESS {
        info!("💳️ Ignoring webhook event of type {event_type}");
        return HttpResponse::Ok().json(JsonResponse::success(format!("Event {event_type} acknowledged.")));
    }
    let gateway_ref = event.data.attributes.data.id.clone();
    let payment = event.payment();
    let description = payment.description.clone().unwrap_or_default();
    let result = match extract_bill_id_from_description(&description) {
        None => {
            warn!("💳️ Webhook payment {gateway_ref} carries no bill reference. Description: '{description}'");
            JsonResponse::failure("No bill reference in the payment description.")
        },
        Some(bill_id) => {
            let method = payment
                .source
                .as_ref()
                .map(|s| PaymentMethod::from_gateway_code(&s.source_type))
                .unwrap_or(PaymentMethod::Unknown);
            let settlement = BillSettlement::new(bill_id, method).with_gateway_ref(gateway_ref.as_str());
            match api.settle_bill(settlement).await {
                Ok((bill, payment)) => {
                    info!("💳️ Webhook settled bill #{} with payment #{} ({})", bill.id, payment.id, payment.amount);
                    JsonResponse::success("Payment recorded.")
                },
                Err(BillingError::BillAlreadySettled(id)) => {
                    info!("💳️ Webhook for bill #{id} arrived after settlement. Nothing to do.");
                    JsonResponse::success("Bill already settled.")
                },
                Err(BillingError::BillNotFound(id)) => {
                    warn!("💳️ Webhook payment {gateway_ref} references bill #{id}, which does not exist");
                    JsonResponse::failure(format!("Bill #{id} does not exist."))
                },
                Err(e) => {
                    warn!("💳️ Could not record webhook payment {gateway_ref}. {e}");
                    JsonResponse::failure("Unexpected error recording the payment.")
                },
            }
        },
    };
    HttpResponse::Ok().json(result)
}
