use anyhow::{Context, Result};
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::{Map, Value};

use crate::utils::constants::{HEADER_API_CONSUMER, HEADER_LEGACY_AUTH, SDK_NAME, SDK_VERSION};

/// Credentials of the handler at the moment the request is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub authorization: Option<String>,
    pub publishable_key: Option<String>,
}

impl Credentials {
    pub fn is_missing(&self) -> bool {
        self.authorization.is_none() && self.publishable_key.is_none()
    }
}

/// Outbound token request.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    pub method: Method,
    pub uri: Option<String>,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn build_request(
    data: Map<String, Value>,
    endpoint: Option<&str>,
    credentials: &Credentials,
) -> Result<RequestConfig> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(HEADER_API_CONSUMER),
        HeaderValue::from_str(&format!("{} {}", SDK_NAME, SDK_VERSION))?,
    );

    // publishable key wins, the two headers are never sent together
    if let Some(key) = &credentials.publishable_key {
        let value = HeaderValue::from_str(&format!("Bearer {}", key))
            .context("publishable key is not a valid header value")?;
        headers.insert(AUTHORIZATION, value);
    } else if let Some(signature) = &credentials.authorization {
        let value = HeaderValue::from_str(signature)
            .context("authorization is not a valid header value")?;
        headers.insert(HeaderName::from_static(HEADER_LEGACY_AUTH), value);
    }

    Ok(RequestConfig {
        method: Method::POST,
        uri: endpoint.map(str::to_owned),
        headers,
        body: Value::Object(data),
    })
}
