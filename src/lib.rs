//! # Rebilly Token Library
//!
//! Builds payment token requests for the Rebilly tokens API: token data is
//! read from a structured mapping or a form, enriched by pluggable modules,
//! its payment method normalized, and the single authenticated request's
//! outcome delivered as a uniform result envelope.
//!
//! Modules:
//! - `config` — YAML configuration, defaults and validation
//! - `modules` — enrichment modules and their concurrent aggregation
//! - `data` — merging caller data with module data
//! - `form` — form field extraction
//! - `method` — legacy method aliases and method detection
//! - `request` — outbound request assembly
//! - `transport` — network exchange
//! - `response` — response normalization
//! - `handler` — the `create_token` pipeline

pub mod config;
pub mod data;
pub mod form;
pub mod handler;
pub mod helpers;
pub mod method;
pub mod modules;
pub mod observability;
pub mod request;
pub mod response;
#[cfg(test)]
pub mod tests;
pub mod transport;
pub mod utils;


pub use crate::config::service::ServiceConfig;
pub use crate::handler::{Completion, HandlerConfig, Rejection, TokenHandler, TokenPayload};
pub use crate::response::ResultEnvelope;
