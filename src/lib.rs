//! # CRM API Library
//!
//! Core functionality for the CRM data service: entity models and
//! repositories, the pure filter/aggregation query layer, session
//! management against the external auth provider, and the HTTP surface.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod query;
pub mod repositories;
pub mod seeds;
pub mod server;
pub mod session;
pub mod telemetry;
pub use migration;
