//! # Water Billing Server
//!
//! This module hosts the HTTP server for the water billing system. It is responsible for:
//! Authenticating consumers, meter readers and utility staff.
//! Accepting meter readings and turning them into bills.
//! Recording payments, whether handed over as cash or settled through the PayMongo gateway.
//! Listening for incoming webhook requests from the payment gateway.
//! Streaming live billing events to connected dashboards.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes a health check, public `/auth` endpoints, the authenticated `/api` surface, the
//! `/webhooks` endpoints for the payment gateway, and a `/live` server-sent-events stream.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod integrations;
pub mod live_events;
pub mod middleware;
pub mod paymongo_routes;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
