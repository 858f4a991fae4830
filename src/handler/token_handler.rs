use std::sync::Arc;

use anyhow::Result;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::config::service::ServiceConfig;
use crate::data::combine::combine;
use crate::form::{FormExtractor, FormSource};
use crate::helpers::value::field_is_truthy;
use crate::method::{convert_legacy, detect_method};
use crate::modules::aggregator::process_modules;
use crate::modules::{build_modules, DataModule};
use crate::observability::metrics::{
    get_metrics, ERROR_MSG, MODULE_FAILURE_MSG, REJECTED_AUTH_MSG, REJECTED_INPUT_MSG,
    SUBMITTED_MSG, SUCCESS_MSG,
};
use crate::request::{build_request, Credentials};
use crate::response::{handle_response, ResultEnvelope};
use crate::transport::Transport;
use crate::utils::constants::{FIELD_METHOD, FIELD_PAYMENT_INSTRUMENT};

/// Token data handed to [`TokenHandler::create_token`].
pub enum TokenPayload<'a> {
    /// already structured token data
    Data(Map<String, Value>),
    /// form to extract the payment instrument and billing address from
    Form(&'a dyn FormSource),
}

impl From<Map<String, Value>> for TokenPayload<'_> {
    fn from(data: Map<String, Value>) -> Self {
        TokenPayload::Data(data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// neither an authorization nor a publishable key is set
    MissingAuthentication,
    /// no method and no payment instrument in the token data
    MissingPaymentData,
}

/// How a `create_token` call ended. A rejected call never reaches the
/// transport and never invokes the callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Submitted,
    Rejected(Rejection),
}

impl Completion {
    pub fn is_submitted(&self) -> bool {
        matches!(self, Completion::Submitted)
    }
}

/// Endpoint and credentials kept across calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerConfig {
    pub endpoint: Option<String>,
    pub authorization: Option<String>,
    pub publishable_key: Option<String>,
}

impl HandlerConfig {
    fn credentials(&self) -> Credentials {
        Credentials {
            authorization: self.authorization.clone(),
            publishable_key: self.publishable_key.clone(),
        }
    }
}

/// Creates payment tokens against the Rebilly tokens endpoint.
pub struct TokenHandler<T> {
    extractor: FormExtractor,
    state: RwLock<HandlerConfig>,
    modules: Vec<Arc<dyn DataModule>>,
    transport: T,
}

impl<T: Transport> TokenHandler<T> {
    pub fn new(config: HandlerConfig, modules: Vec<Arc<dyn DataModule>>, transport: T) -> Self {
        Self {
            extractor: FormExtractor::default(),
            state: RwLock::new(config),
            modules,
            transport,
        }
    }

    pub fn from_config(service_config: &ServiceConfig, transport: T) -> Result<Self> {
        let config = HandlerConfig {
            endpoint: service_config.endpoint.clone(),
            authorization: service_config.auth.authorization.clone(),
            publishable_key: service_config.auth.publishable_key.clone(),
        };
        let modules = build_modules(&service_config.modules)?;
        Ok(Self::new(config, modules, transport))
    }

    pub fn with_extractor(mut self, extractor: FormExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn modules(&self) -> &[Arc<dyn DataModule>] {
        &self.modules
    }

    pub async fn endpoint(&self) -> Option<String> {
        self.state.read().await.endpoint.clone()
    }

    pub async fn authorization(&self) -> Option<String> {
        self.state.read().await.authorization.clone()
    }

    pub async fn publishable_key(&self) -> Option<String> {
        self.state.read().await.publishable_key.clone()
    }

    /// Overwrite the endpoint URL, `None` unsets it.
    pub async fn set_endpoint(&self, url: Option<String>) {
        self.state.write().await.endpoint = url;
    }

    /// Legacy signature sent as `reb-auth`, `None` unsets it.
    pub async fn set_auth(&self, signature: Option<String>) {
        self.state.write().await.authorization = signature;
    }

    /// Publishable key sent as a bearer token, takes precedence over the
    /// legacy signature. `None` unsets it.
    pub async fn set_publishable_key(&self, key: Option<String>) {
        self.state.write().await.publishable_key = key;
    }

    /// Run every module and merge their results.
    pub async fn process_modules(&self) -> Result<Map<String, Value>> {
        process_modules(&self.modules).await
    }

    /// Combine token data with the module results.
    pub async fn combine_data(&self, data: Map<String, Value>) -> Result<Map<String, Value>> {
        let module_data = self.process_modules().await?;
        Ok(combine(data, module_data))
    }

    /// Build and submit a token request, the result is delivered to `callback`.
    ///
    /// Validation problems are logged and reported as [`Completion::Rejected`]
    /// without calling `callback`. A failing module aborts the call with an
    /// error, nothing is submitted.
    pub async fn create_token<F>(
        &self,
        payload: TokenPayload<'_>,
        callback: F,
        extra_data: Option<Map<String, Value>>,
    ) -> Result<Completion>
    where
        F: FnOnce(ResultEnvelope) + Send,
    {
        let metrics = get_metrics().await;

        if self.state.read().await.credentials().is_missing() {
            error!("Missing Rebilly authentication value");
            metrics.token_requests.with_label_values(&[REJECTED_AUTH_MSG]).inc();
            return Ok(Completion::Rejected(Rejection::MissingAuthentication));
        }

        let mut data = match payload {
            TokenPayload::Data(data) => data,
            TokenPayload::Form(form) => self.extractor.extract(form).into_data(),
        };
        if let Some(extra_data) = extra_data {
            data.extend(extra_data);
        }

        let mut data = self.combine_data(data).await.inspect_err(|_| {
            metrics.token_requests.with_label_values(&[MODULE_FAILURE_MSG]).inc();
        })?;

        if field_is_truthy(&data, FIELD_METHOD) {
            convert_legacy(&mut data);
        } else if field_is_truthy(&data, FIELD_PAYMENT_INSTRUMENT) {
            detect_method(&mut data);
        } else {
            error!("Missing method and payment instrument data");
            metrics.token_requests.with_label_values(&[REJECTED_INPUT_MSG]).inc();
            return Ok(Completion::Rejected(Rejection::MissingPaymentData));
        }

        // credentials are read again here, setters may have run meanwhile
        let config = {
            let state = self.state.read().await;
            build_request(data, state.endpoint.as_deref(), &state.credentials())?
        };
        debug!("submitting token request to {:?}", config.uri);
        metrics.token_requests.with_label_values(&[SUBMITTED_MSG]).inc();

        let start = Instant::now();
        let reply = self.transport.send(&config).await;

        let complete = handle_response(move |envelope: ResultEnvelope| {
            let result = if envelope.error { ERROR_MSG } else { SUCCESS_MSG };
            metrics.token_responses.with_label_values(&[result]).inc();
            metrics
                .submit_duration
                .with_label_values(&[result])
                .observe(start.elapsed().as_secs_f64());
            callback(envelope);
        });
        complete(reply.error, reply.response, reply.body);

        Ok(Completion::Submitted)
    }
}
