use anyhow::Result;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;

pub static SUBMITTED_MSG: &str = "submitted";
pub static REJECTED_AUTH_MSG: &str = "rejected_auth";
pub static REJECTED_INPUT_MSG: &str = "rejected_input";
pub static MODULE_FAILURE_MSG: &str = "module_failure";
pub static SUCCESS_MSG: &str = "success";
pub static ERROR_MSG: &str = "error";

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token creation metrics
    pub token_requests: IntCounterVec,
    pub token_responses: IntCounterVec,
    pub submit_duration: HistogramVec,

    // Module metrics
    pub module_failures: IntCounterVec,

    // Config/runtime
    pub config_validation_errors: IntCounter,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("rebillytoken".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            token_requests: IntCounterVec::new(Opts::new("token_requests_total", "createToken calls by outcome"),&["outcome"],).unwrap(),
            token_responses: IntCounterVec::new(Opts::new("token_responses_total", "Token responses by result"),&["result"],).unwrap(),
            submit_duration: HistogramVec::new(HistogramOpts::new("token_submit_duration_seconds", "Token submission duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),&["result"],).unwrap(),

            module_failures: IntCounterVec::new(Opts::new("module_failures_total", "Enrichment module failures"),&["module"],).unwrap(),

            config_validation_errors: IntCounter::new("config_validation_errors_total","Validation errors while loading config",).unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_requests.clone())).unwrap();
        reg.register(Box::new(metrics.token_responses.clone())).unwrap();
        reg.register(Box::new(metrics.submit_duration.clone())).unwrap();
        reg.register(Box::new(metrics.module_failures.clone())).unwrap();
        reg.register(Box::new(metrics.config_validation_errors.clone())).unwrap();

        metrics
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
