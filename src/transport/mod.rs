//! Transport
//!
//! Performs the network exchange for a built [`RequestConfig`] and hands back
//! the error/response/body triple the response normalizer consumes.

use std::future::Future;

use serde::Serialize;
use serde_json::Value;

use crate::request::RequestConfig;

pub mod http_client;

pub use http_client::ReqwestTransport;

pub trait Transport: Send + Sync {
    /// Invoked exactly once per submission, never fails: problems are
    /// reported through [`TransportReply::error`].
    fn send(&self, config: &RequestConfig) -> impl Future<Output = TransportReply> + Send;
}

/// Identifies the request a response belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawRequest {
    pub method: String,
    pub uri: Option<String>,
}

impl From<&RequestConfig> for RawRequest {
    fn from(config: &RequestConfig) -> Self {
        Self {
            method: config.method.to_string(),
            uri: config.uri.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// `None` when no response was received
    pub status_code: Option<u16>,
    pub raw_request: RawRequest,
}

#[derive(Debug)]
pub struct TransportReply {
    pub error: Option<anyhow::Error>,
    pub response: TransportResponse,
    pub body: Value,
}

impl TransportReply {
    pub fn failed(raw_request: RawRequest, status_code: Option<u16>, error: anyhow::Error) -> Self {
        Self {
            error: Some(error),
            response: TransportResponse { status_code, raw_request },
            body: Value::Null,
        }
    }

    pub fn completed(raw_request: RawRequest, status_code: u16, body: Value) -> Self {
        Self {
            error: None,
            response: TransportResponse { status_code: Some(status_code), raw_request },
            body,
        }
    }
}
