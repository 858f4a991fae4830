use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::request::RequestConfig;
use crate::transport::{RawRequest, Transport, TransportReply};

/// Default transport backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, config: &RequestConfig) -> TransportReply {
        let raw_request = RawRequest::from(config);
        let Some(uri) = &config.uri else {
            return TransportReply::failed(raw_request, None, anyhow!("Missing Rebilly endpoint"));
        };

        debug!("{} {}", config.method, uri);
        let response = match self
            .client
            .request(config.method.clone(), uri)
            .headers(config.headers.clone())
            .json(&config.body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("token request to {} failed: {}", uri, e);
                return TransportReply::failed(raw_request, None, anyhow!(e));
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(text) => TransportReply::completed(raw_request, status, parse_body(text)),
            Err(e) => TransportReply::failed(raw_request, Some(status), anyhow!(e)),
        }
    }
}

/// JSON when possible, the raw text otherwise; an empty body is `null`.
fn parse_body(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}
