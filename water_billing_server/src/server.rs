//! Server assembly.
//!
//! [`run_server`] owns process-wide setup: the database pool (with migrations), the live event broadcaster,
//! the push gateway and the billing event handlers. [`create_server_instance`] builds the actix `Server`
//! itself; the `HttpServer::new` closure runs once per worker, so everything constructed inside it must be
//! cheap to clone.
//!
//! The surface splits into four groups:
//! * public: `GET /health` and the `GET /live` event stream,
//! * `/auth`: registration and login, which is where access tokens come from,
//! * `/api`: everything that needs a valid access token, wrapped in the JWT middleware,
//! * `/webhooks`: gateway deliveries, wrapped in the HMAC middleware instead of JWT.

use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use paymongo_tools::PayMongoApi;
use water_billing_engine::{
    events::EventProducers,
    AccountApi,
    AuthApi,
    BillingFlowApi,
    IssueApi,
    NotificationApi,
    SettingsApi,
    SqliteDatabase,
};

use crate::{
    auth::TokenIssuer,
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    integrations::{create_billing_event_handlers, PushGateway},
    live_events::{live_events, EventBroadcaster},
    middleware::{HmacMiddlewareFactory, JwtMiddlewareFactory},
    paymongo_routes::{AttachPaymentRoute, CheckoutRoute, PaymongoWebhookRoute},
    routes::{
        health,
        BillStatsRoute,
        BillsForUserRoute,
        CreateBillRoute,
        GetSettingsRoute,
        IngestReadingRoute,
        IssuesRoute,
        LoginRoute,
        NotificationsForUserRoute,
        PaymentsForUserRoute,
        ReadingsForUserRoute,
        RecordPaymentRoute,
        RegisterDeviceTokenRoute,
        RegisterRoute,
        ReportIssueRoute,
        UpdateIssueRoute,
        UpdateSettingsRoute,
        UsersByPurokRoute,
        UsersRoute,
    },
};

/// The header PayMongo puts its webhook signature in.
pub const PAYMONGO_SIGNATURE_HEADER: &str = "Paymongo-Signature";

const MAX_DATABASE_CONNECTIONS: u32 = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, MAX_DATABASE_CONNECTIONS)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(format!("Migrations failed. {e}")))?;
    let broadcaster = EventBroadcaster::new();
    let push = PushGateway::new(config.push_endpoint.clone())?;
    let handlers = create_billing_event_handlers(db.clone(), broadcaster.clone(), push.clone());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let srv = create_server_instance(config, db, producers, broadcaster, push)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
    broadcaster: EventBroadcaster,
    push: PushGateway,
) -> Result<Server, ServerError> {
    let gateway =
        PayMongoApi::new(config.paymongo.api.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let options = ServerOptions::from_config(&config);
    let srv = HttpServer::new(move || {
        let billing_api = BillingFlowApi::new(db.clone(), producers.clone());
        let accounts_api = AccountApi::new(db.clone());
        let auth_api = AuthApi::new(db.clone());
        let issues_api = IssueApi::new(db.clone());
        let notifications_api = NotificationApi::new(db.clone());
        let settings_api = SettingsApi::new(db.clone());
        let jwt_signer = TokenIssuer::new(&config.auth);
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("wbs::access_log"))
            .app_data(web::Data::new(billing_api))
            .app_data(web::Data::new(accounts_api))
            .app_data(web::Data::new(auth_api))
            .app_data(web::Data::new(issues_api))
            .app_data(web::Data::new(notifications_api))
            .app_data(web::Data::new(settings_api))
            .app_data(web::Data::new(jwt_signer.clone()))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(broadcaster.clone()))
            .app_data(web::Data::new(push.clone()))
            .app_data(web::Data::new(options));
        // Where access tokens come from
        let auth_scope = web::scope("/auth")
            .service(RegisterRoute::<SqliteDatabase>::new())
            .service(LoginRoute::<SqliteDatabase, SqliteDatabase>::new());
        // Routes that require authentication
        let api_scope = web::scope("/api")
            .wrap(JwtMiddlewareFactory::new(jwt_signer))
            .service(IngestReadingRoute::<SqliteDatabase>::new())
            .service(ReadingsForUserRoute::<SqliteDatabase>::new())
            .service(CreateBillRoute::<SqliteDatabase>::new())
            .service(BillsForUserRoute::<SqliteDatabase>::new())
            .service(RecordPaymentRoute::<SqliteDatabase>::new())
            .service(PaymentsForUserRoute::<SqliteDatabase>::new())
            .service(CheckoutRoute::<SqliteDatabase>::new())
            .service(AttachPaymentRoute::<SqliteDatabase>::new())
            .service(NotificationsForUserRoute::<SqliteDatabase>::new())
            .service(RegisterDeviceTokenRoute::<SqliteDatabase>::new())
            .service(UsersByPurokRoute::<SqliteDatabase>::new())
            .service(UsersRoute::<SqliteDatabase>::new())
            .service(ReportIssueRoute::<SqliteDatabase>::new())
            .service(IssuesRoute::<SqliteDatabase>::new())
            .service(UpdateIssueRoute::<SqliteDatabase>::new())
            .service(GetSettingsRoute::<SqliteDatabase>::new())
            .service(UpdateSettingsRoute::<SqliteDatabase>::new())
            .service(BillStatsRoute::<SqliteDatabase>::new());
        // Gateway deliveries authenticate with a body signature, not a token
        let webhook_scope = web::scope("/webhooks")
            .wrap(HmacMiddlewareFactory::new(
                PAYMONGO_SIGNATURE_HEADER,
                config.paymongo.webhook_secret.clone(),
                config.paymongo.hmac_checks,
            ))
            .service(PaymongoWebhookRoute::<SqliteDatabase>::new());
        app.service(health).service(live_events).service(auth_scope).service(api_scope).service(webhook_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
