//! Access token middleware.
//!
//! This middleware wraps the authenticated `/api` scope. Every request must carry a valid access token in
//! the [`ACCESS_TOKEN_HEADER`](crate::auth::ACCESS_TOKEN_HEADER) header. The token is validated and the
//! decoded [`JwtClaims`](crate::auth::JwtClaims) are stored in the request extensions, where handlers and
//! the ACL middleware pick them up. Requests without a valid token receive a 401 Unauthorized response.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    Error,
    HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use log::{debug, warn};

use crate::auth::{TokenIssuer, ACCESS_TOKEN_HEADER};

pub struct JwtMiddlewareFactory {
    issuer: TokenIssuer,
}

impl JwtMiddlewareFactory {
    pub fn new(issuer: TokenIssuer) -> Self {
        JwtMiddlewareFactory { issuer }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;
    type InitError = ();
    type Response = ServiceResponse<B>;
    type Transform = JwtMiddlewareService<S>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(JwtMiddlewareService { issuer: self.issuer.clone(), service: Rc::new(service) })
    }
}

pub struct JwtMiddlewareService<S> {
    issuer: TokenIssuer,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;
    type Response = ServiceResponse<B>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let issuer = self.issuer.clone();
        Box::pin(async move {
            let token = req.headers().get(ACCESS_TOKEN_HEADER).and_then(|v| v.to_str().ok()).ok_or_else(|| {
                debug!("🔑️ No access token on request to {}", req.path());
                ErrorUnauthorized("An access token is required.")
            })?;
            let claims = issuer.validate(token).map_err(|e| {
                warn!("🔑️ Rejecting access token: {e}");
                ErrorUnauthorized("Access token is invalid or expired.")
            })?;
            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}
