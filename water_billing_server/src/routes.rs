//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution:
//!
//! ```nocompile
//!     async fn my_handler() -> impl Responder {
//!         tokio::time::sleep(Duration::from_secs(5)).await; // <-- Ok. Worker thread will handle other requests here
//!     }
//! ```
use std::collections::BTreeMap;

use actix_web::{get, web, HttpResponse, Responder};
use bcrypt::{hash, verify, DEFAULT_COST};
use log::*;
use water_billing_engine::{
    db_types::{
        Issue,
        IssueUpdate,
        NewIssue,
        NewMeterReading,
        NewNotification,
        NewSystemSettings,
        NewUser,
        ResourceId,
        Role,
        User,
    },
    query_objects::UserQueryFilter,
    traits::{
        AccountManagement,
        AuthApiError,
        AuthManagement,
        BillSettlement,
        BillingDatabase,
        IssueTracking,
        NotificationManagement,
        SettingsManagement,
    },
    AccountApi,
    AuthApi,
    BillingFlowApi,
    IssueApi,
    NotificationApi,
    SettingsApi,
};

use crate::{
    auth::{JwtClaims, TokenIssuer},
    data_objects::{
        DeviceTokenRequest,
        IssueRequest,
        JsonResponse,
        LoginRequest,
        LoginResponse,
        NewBillRequest,
        PaymentRequest,
        ReadingWithBill,
        RegisterUserRequest,
        SettlementResponse,
    },
    errors::{AuthError, ServerError},
    integrations::PushGateway,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal requires [$($roles:ty),*]) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
                impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name)
                        .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+ where requires [$($roles:ty),*])  => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::AclMiddlewareFactory::new(&[$($roles),+]));
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------

route!(register => Post "/register" impl AuthManagement);
/// Route handler for the registration endpoint
///
/// Anyone can open an account. The password is bcrypt-hashed here at the boundary; the plaintext is never
/// stored or logged. A fresh access token is issued in the response so that clients can proceed without a
/// second round trip to `/auth/login`. Duplicate usernames are a 409.
pub async fn register<B: AuthManagement>(
    body: web::Json<RegisterUserRequest>,
    api: web::Data<AuthApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💻️ POST register for username {}", req.username);
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err(ServerError::InvalidRequestBody("A username and password are required".to_string()));
    }
    let password_hash =
        hash(&req.password, DEFAULT_COST).map_err(|e| ServerError::BackendError(format!("Could not hash password. {e}")))?;
    let new_user = NewUser {
        username: req.username.trim().to_string(),
        password_hash,
        role: req.role.unwrap_or(Role::Customer),
        full_name: req.full_name,
        address: req.address,
        purok: req.purok,
        meter_number: req.meter_number,
        phone: req.phone,
        email: req.email,
    };
    let user = api.register(new_user).await?;
    info!("💻️ New {} account registered for {}", user.role, user.username);
    let token = signer.issue(&user)?;
    Ok(HttpResponse::Ok().json(LoginResponse { token, user }))
}

route!(login => Post "/login" impl AuthManagement, AccountManagement);
/// Route handler for the login endpoint
///
/// Verifies the password against the stored bcrypt hash and issues a JWT access token carrying the user's id,
/// username and role. Unknown usernames and wrong passwords are indistinguishable to the caller; both come
/// back as a 401 "Invalid username or password".
pub async fn login<A, B>(
    body: web::Json<LoginRequest>,
    auth_api: web::Data<AuthApi<A>>,
    accounts: web::Data<AccountApi<B>>,
    signer: web::Data<TokenIssuer>,
) -> Result<HttpResponse, ServerError>
where
    A: AuthManagement,
    B: AccountManagement,
{
    let req = body.into_inner();
    debug!("💻️ POST login for {}", req.username);
    let credentials = match auth_api.credentials(&req.username).await {
        Ok(credentials) => credentials,
        Err(AuthApiError::UserNotFound) => {
            debug!("💻️ Login attempt for unknown username {}", req.username);
            return Err(AuthError::InvalidCredentials.into());
        },
        Err(e) => return Err(e.into()),
    };
    if !verify(&req.password, &credentials.password_hash).unwrap_or(false) {
        debug!("💻️ Incorrect password for {}", req.username);
        return Err(AuthError::InvalidCredentials.into());
    }
    let user = accounts
        .user_by_id(credentials.id)
        .await?
        .ok_or_else(|| ServerError::BackendError("User record disappeared between lookups".to_string()))?;
    let token = signer.issue(&user)?;
    info!("💻️ {} logged in", user.username);
    Ok(HttpResponse::Ok().json(LoginResponse { token, user }))
}

//----------------------------------------------   Readings  ----------------------------------------------------

route!(ingest_reading => Post "/readings" impl BillingDatabase where requires [Role::MeterReader, Role::Admin]);
/// Route handler for submitting a meter reading
///
/// Field workers post the meter counter here. The engine stores the reading, prices the consumption against
/// the current tariff, issues the bill and queues the customer's notification in a single flow. The response
/// carries both the stored reading and the freshly issued bill.
pub async fn ingest_reading<A: BillingDatabase>(
    body: web::Json<NewMeterReading>,
    api: web::Data<BillingFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let new_reading = body.into_inner();
    debug!("💻️ POST new reading for user {}", new_reading.user_id);
    let (reading, bill) = api.ingest_reading(new_reading).await?;
    info!("💻️ Reading #{} stored. Bill #{} issued for {}", reading.id, bill.id, bill.amount_due);
    Ok(HttpResponse::Ok().json(ReadingWithBill { reading, bill }))
}

route!(readings_for_user => Get "/readings/{user_id}" impl AccountManagement);
/// Reading history for a user, newest first. Customers can only fetch their own.
pub async fn readings_for_user<B: AccountManagement>(
    claims: JwtClaims,
    path: web::Path<ResourceId>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    assert_can_view(&claims, user_id)?;
    debug!("💻️ GET readings for user {user_id}");
    let readings = api.readings_for_user(user_id).await?;
    Ok(HttpResponse::Ok().json(readings))
}

//----------------------------------------------   Bills  ----------------------------------------------------

route!(create_bill => Post "/bills" impl BillingDatabase where requires [Role::Admin]);
/// Issues a bill for a reading that does not have one yet. The regular path creates the bill together with
/// the reading; this endpoint exists for back-filling after a correction. A reading that is already billed
/// is a 409.
pub async fn create_bill<A: BillingDatabase>(
    body: web::Json<NewBillRequest>,
    api: web::Data<BillingFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let reading_id = body.into_inner().reading_id;
    debug!("💻️ POST create bill for reading {reading_id}");
    let bill = api.bill_reading(reading_id).await?;
    info!("💻️ Bill #{} issued for reading #{reading_id}. Amount due: {}", bill.id, bill.amount_due);
    Ok(HttpResponse::Ok().json(bill))
}

route!(bills_for_user => Get "/bills/{user_id}" impl AccountManagement);
/// Billing history for a user. Customers can only fetch their own.
pub async fn bills_for_user<B: AccountManagement>(
    claims: JwtClaims,
    path: web::Path<ResourceId>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    assert_can_view(&claims, user_id)?;
    debug!("💻️ GET bills for user {user_id}");
    let bills = api.bills_for_user(user_id).await?;
    Ok(HttpResponse::Ok().json(bills))
}

//----------------------------------------------   Payments  ----------------------------------------------------

route!(record_payment => Post "/payments" impl BillingDatabase where requires [Role::Admin]);
/// Route handler for recording an off-gateway payment
///
/// Staff use this when money arrives as cash or over the counter. The settlement runs through the same
/// guarded transition as the gateway paths, so paying an already-settled bill is a 409 no matter who tries.
pub async fn record_payment<A: BillingDatabase>(
    body: web::Json<PaymentRequest>,
    api: web::Data<BillingFlowApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    debug!("💻️ POST record {} payment for bill {}", req.method, req.bill_id);
    let mut settlement = BillSettlement::new(req.bill_id, req.method);
    if let Some(when) = req.payment_date {
        settlement = settlement.paid_on(when);
    }
    let (bill, payment) = api.settle_bill(settlement).await?;
    info!("💻️ Bill #{} settled. Payment #{} of {} via {}", bill.id, payment.id, payment.amount, payment.method);
    Ok(HttpResponse::Ok().json(SettlementResponse { bill, payment }))
}

route!(payments_for_user => Get "/payments/{user_id}" impl AccountManagement);
/// Payment history for a user. Customers can only fetch their own.
pub async fn payments_for_user<B: AccountManagement>(
    claims: JwtClaims,
    path: web::Path<ResourceId>,
    api: web::Data<AccountApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    assert_can_view(&claims, user_id)?;
    debug!("💻️ GET payments for user {user_id}");
    let payments = api.payments_for_user(user_id).await?;
    Ok(HttpResponse::Ok().json(payments))
}

//----------------------------------------------   Notifications  ----------------------------------------------------

route!(notifications_for_user => Get "/notifications/{user_id}" impl NotificationManagement);
/// The latest notifications for a user, newest first. Customers can only fetch their own feed.
pub async fn notifications_for_user<B: NotificationManagement>(
    claims: JwtClaims,
    path: web::Path<ResourceId>,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let user_id = path.into_inner();
    assert_can_view(&claims, user_id)?;
    debug!("💻️ GET notifications for user {user_id}");
    let notifications = api.latest_for_user(user_id).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

route!(register_device_token => Post "/device-token" impl NotificationManagement);
/// Registers (or replaces) the push device token for an account. Customers can only register a token for
/// themselves; admins can do it for anyone, which the support desk uses when helping someone re-install the
/// app.
pub async fn register_device_token<B: NotificationManagement>(
    claims: JwtClaims,
    body: web::Json<DeviceTokenRequest>,
    api: web::Data<NotificationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let req = body.into_inner();
    if claims.role != Role::Admin && claims.sub != req.user_id {
        debug!("💻️ User #{} tried to register a device token for user #{}", claims.sub, req.user_id);
        return Err(ServerError::InsufficientPermissions(
            "You can only register a device token for your own account".to_string(),
        ));
    }
    if req.device_token.trim().is_empty() {
        return Err(ServerError::InvalidRequestBody("The device token must not be empty".to_string()));
    }
    api.register_device_token(req.user_id, &req.device_token).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("Device token registered.")))
}

//----------------------------------------------   Users  ----------------------------------------------------

route!(users => Get "/users" impl AccountManagement where requires [Role::Admin]);
/// Route handler for the user listing
///
/// Supports optional query filters, e.g. `/api/users?role=customer&purok=Riverside`, or a substring match on
/// the full name with `name=santos`. An empty filter returns everyone.
pub async fn users<A: AccountManagement>(
    query: web::Query<UserQueryFilter>,
    api: web::Data<AccountApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let filter = query.into_inner();
    debug!("💻️ GET users ({filter})");
    let users = api.search_users(filter).await?;
    Ok(HttpResponse::Ok().json(users))
}

route!(users_by_purok => Get "/users/by-purok" impl AccountManagement where requires [Role::Admin]);
/// Consumers grouped by purok, in purok order, for planning the meter-reading and collection rounds.
/// Customers without a purok on file are grouped under "Unassigned".
pub async fn users_by_purok<A: AccountManagement>(api: web::Data<AccountApi<A>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET users by purok");
    let customers = api.search_users(UserQueryFilter::default().with_role(Role::Customer)).await?;
    let mut grouped: BTreeMap<String, Vec<User>> = BTreeMap::new();
    for user in customers {
        let purok = user.purok.clone().unwrap_or_else(|| "Unassigned".to_string());
        grouped.entry(purok).or_default().push(user);
    }
    Ok(HttpResponse::Ok().json(grouped))
}

//----------------------------------------------   Issues  ----------------------------------------------------

route!(report_issue => Post "/issues" impl IssueTracking);
/// Any signed-in user can report a supply issue (a leak, low pressure, a broken meter). The reporter is
/// always the caller; there is no reporting on someone else's behalf.
pub async fn report_issue<B: IssueTracking>(
    claims: JwtClaims,
    body: web::Json<IssueRequest>,
    api: web::Data<IssueApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let description = body.into_inner().description;
    if description.trim().is_empty() {
        return Err(ServerError::InvalidRequestBody("An issue report needs a description".to_string()));
    }
    debug!("💻️ POST new issue from user {}", claims.sub);
    let issue = api.report(NewIssue::new(claims.sub, description)).await?;
    Ok(HttpResponse::Ok().json(issue))
}

route!(issues => Get "/issues" impl IssueTracking where requires [Role::Admin]);
/// All reported issues, newest first.
pub async fn issues<A: IssueTracking>(api: web::Data<IssueApi<A>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET issues");
    let issues = api.all_issues().await?;
    Ok(HttpResponse::Ok().json(issues))
}

route!(update_issue => Patch "/issues/{id}" impl IssueTracking, NotificationManagement where requires [Role::Admin]);
/// Applies a partial update to an issue: schedule the repair visit, mark it resolved, or both. Scheduling a
/// fixing date or resolving the issue notifies the reporter (durable row plus best-effort push); the
/// notification outcome never affects the update itself.
pub async fn update_issue<A>(
    path: web::Path<ResourceId>,
    body: web::Json<IssueUpdate>,
    api: web::Data<IssueApi<A>>,
    notifications: web::Data<NotificationApi<A>>,
    push: web::Data<PushGateway>,
) -> Result<HttpResponse, ServerError>
where
    A: IssueTracking + NotificationManagement,
{
    let id = path.into_inner();
    let update = body.into_inner();
    debug!("💻️ PATCH issue {id}");
    let issue = api.update(id, update.clone()).await?;
    notify_reporter(&issue, &update, notifications.as_ref(), push.as_ref()).await;
    Ok(HttpResponse::Ok().json(issue))
}

/// Tells the reporter what changed about their issue.
async fn notify_reporter<B: NotificationManagement>(
    issue: &Issue,
    update: &IssueUpdate,
    notifications: &NotificationApi<B>,
    push: &PushGateway,
) {
    let message = if let Some(when) = update.fixing_date {
        format!("Your reported issue has been scheduled for fixing on {}.", when.format("%d %b %Y"))
    } else if update.is_resolved == Some(true) {
        "Your reported issue has been resolved. Thank you for your patience.".to_string()
    } else {
        return;
    };
    if let Err(e) = notifications.record(NewNotification::new(issue.user_id, "Issue update", message.clone())).await {
        warn!("💻️ Could not store the issue update notification for user #{}. {e}", issue.user_id);
    }
    match notifications.device_token(issue.user_id).await {
        Ok(Some(token)) => push.send(&token, "Issue update", &message).await,
        Ok(None) => debug!("💻️ User #{} has no device token for the issue update", issue.user_id),
        Err(e) => warn!("💻️ Could not fetch a device token for user #{}. {e}", issue.user_id),
    }
}

//----------------------------------------------   Settings  ----------------------------------------------------

route!(get_settings => Get "/settings" impl SettingsManagement where requires [Role::Admin]);
/// The current billing configuration. If none has ever been saved, the defaults are created and returned.
pub async fn get_settings<A: SettingsManagement>(api: web::Data<SettingsApi<A>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET settings");
    let settings = api.current().await?;
    Ok(HttpResponse::Ok().json(settings))
}

route!(update_settings => Post "/settings" impl SettingsManagement where requires [Role::Admin]);
/// Replaces the billing configuration wholesale. Last writer wins; bills priced after this call use the new
/// tariff, already-issued bills are untouched.
pub async fn update_settings<A: SettingsManagement>(
    body: web::Json<NewSystemSettings>,
    api: web::Data<SettingsApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let settings = body.into_inner();
    debug!("💻️ POST replace settings");
    let saved = api.replace(settings).await?;
    Ok(HttpResponse::Ok().json(saved))
}

//----------------------------------------------   Stats  ----------------------------------------------------

route!(bill_stats => Get "/stats/bills" impl AccountManagement where requires [Role::Admin]);
/// Pending and paid bill counts, plus revenue collected this calendar month.
pub async fn bill_stats<A: AccountManagement>(api: web::Data<AccountApi<A>>) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET bill stats");
    let stats = api.bill_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

//----------------------------------------------   Helpers  ----------------------------------------------------

/// Customers may only look at their own records. Staff roles may look at anyone's.
pub(crate) fn assert_can_view(claims: &JwtClaims, user_id: ResourceId) -> Result<(), ServerError> {
    match claims.role {
        Role::Admin | Role::MeterReader => Ok(()),
        Role::Customer if claims.sub == user_id => Ok(()),
        Role::Customer => {
            debug!("💻️ User #{} tried to access records belonging to user #{user_id}", claims.sub);
            Err(ServerError::InsufficientPermissions("You can only view your own records".to_string()))
        },
    }
}
