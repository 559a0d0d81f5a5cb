//! Handler tests against mocked engine backends.
//!
//! These run the real routes, middleware and extractors through `actix_web::test`, with every database
//! trait replaced by a `mockall` mock. The engine's own integration tests cover the SQLite flows; here we
//! only care that requests are authenticated, routed, validated and serialized correctly.

mod helpers;
mod mocks;

mod auth;
mod misc;
mod readings;
mod webhooks;
