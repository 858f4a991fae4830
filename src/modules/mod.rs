//! Enrichment modules
//!
//! A module is a zero-argument data producer whose mapping is merged into
//! every outgoing token request. Modules run once per `create_token` call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::config::service::ModuleConfig;

pub mod aggregator;
pub mod lead_source;
pub mod static_fields;

use lead_source::LeadSourceModule;
use static_fields::StaticModule;

pub type ModuleData = Map<String, Value>;
pub type ModuleFuture = Pin<Box<dyn Future<Output = Result<ModuleData>> + Send>>;

pub trait DataModule: Send + Sync {
    fn name(&self) -> &str;

    /// Start the computation. The returned future is awaited together with
    /// the futures of every other registered module.
    fn collect(&self) -> ModuleFuture;
}

/// Adapts a closure returning a future into a [`DataModule`].
pub struct FnModule<F> {
    name: String,
    producer: F,
}

impl<F, Fut> FnModule<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<ModuleData>> + Send + 'static,
{
    pub fn new(name: impl Into<String>, producer: F) -> Self {
        Self { name: name.into(), producer }
    }
}

impl<F, Fut> DataModule for FnModule<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<ModuleData>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn collect(&self) -> ModuleFuture {
        Box::pin((self.producer)())
    }
}

pub fn build_module(cfg: &ModuleConfig) -> Result<Arc<dyn DataModule>> {
    match cfg {
        ModuleConfig::Static { fields } => Ok(Arc::new(StaticModule::new(fields.clone()))),
        ModuleConfig::LeadSource { url, referrer } => {
            Ok(Arc::new(LeadSourceModule::from_url(url, referrer.clone())?))
        }
    }
}

pub fn build_modules(cfgs: &[ModuleConfig]) -> Result<Vec<Arc<dyn DataModule>>> {
    cfgs.iter().map(build_module).collect()
}
