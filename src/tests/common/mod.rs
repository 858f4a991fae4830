// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use crate::request::RequestConfig;
use crate::transport::{RawRequest, Transport, TransportReply};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// `json!({...})` as a token data map.
pub fn map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {}", other),
    }
}

/// Canned answer of a [`RecordingTransport`].
#[derive(Debug, Clone)]
pub enum CannedReply {
    Status(u16, Value),
    Failure(String),
}

/// Records every submitted request and answers with a canned reply.
#[derive(Debug, Clone)]
pub struct RecordingTransport {
    pub requests: Arc<Mutex<Vec<RequestConfig>>>,
    reply: CannedReply,
}

impl RecordingTransport {
    pub fn new(reply: CannedReply) -> Self {
        Self { requests: Arc::new(Mutex::new(Vec::new())), reply }
    }

    pub fn created(body: Value) -> Self {
        Self::new(CannedReply::Status(201, body))
    }

    pub fn sent(&self) -> Vec<RequestConfig> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, config: &RequestConfig) -> TransportReply {
        self.requests.lock().unwrap().push(config.clone());
        let raw_request = RawRequest::from(config);
        match &self.reply {
            CannedReply::Status(status, body) => TransportReply::completed(raw_request, *status, body.clone()),
            CannedReply::Failure(message) => {
                TransportReply::failed(raw_request, None, anyhow::anyhow!(message.clone()))
            }
        }
    }
}
