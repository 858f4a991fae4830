use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::transport::{RawRequest, TransportResponse};
use crate::utils::constants::{SUCCESS_MSG, SUCCESS_STATUS};

/// Uniform result of a submitted token request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    pub transport_handle: RawRequest,
    pub status_code: Option<u16>,
    pub error: bool,
    pub data: Option<Value>,
    pub message: String,
}

impl ResultEnvelope {
    pub fn is_success(&self) -> bool {
        !self.error
    }
}

/// Wrap the user callback into a transport completion handler.
///
/// The callback runs exactly once, synchronously inside the returned closure.
pub fn handle_response<F>(callback: F) -> impl FnOnce(Option<anyhow::Error>, TransportResponse, Value)
where
    F: FnOnce(ResultEnvelope),
{
    move |error: Option<anyhow::Error>, response: TransportResponse, body: Value| {
        let mut envelope = ResultEnvelope {
            transport_handle: response.raw_request,
            status_code: response.status_code,
            error: false,
            data: None,
            message: SUCCESS_MSG.to_owned(),
        };

        // error prior to or during the exchange
        if let Some(error) = error {
            envelope.error = true;
            envelope.message = error.to_string();
        } else {
            if response.status_code != Some(SUCCESS_STATUS) {
                envelope.error = true;
                envelope.message = error_message(&body);
            }
            envelope.data = Some(body);
        }
        debug!("token response status {:?}, error: {}", envelope.status_code, envelope.error);
        callback(envelope);
    }
}

/// The `error` field of an API error body.
fn error_message(body: &Value) -> String {
    match body.get("error") {
        Some(Value::String(message)) => message.to_owned(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
