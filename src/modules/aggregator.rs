use std::sync::Arc;

use anyhow::Result;
use futures::future::try_join_all;
use tracing::{debug, error};

use crate::data::combine::merge_ordered;
use crate::modules::{DataModule, ModuleData};
use crate::observability::metrics::get_metrics;

/// Run every module concurrently and merge their mappings in registration
/// order, later modules overwrite same-named keys of earlier ones.
/// The first failing module fails the whole aggregation.
pub async fn process_modules(modules: &[Arc<dyn DataModule>]) -> Result<ModuleData> {
    if modules.is_empty() {
        return Ok(ModuleData::new());
    }

    let pending = modules.iter().map(|module| {
        let name = module.name().to_owned();
        let computation = module.collect();
        async move {
            match computation.await {
                Ok(data) => {
                    debug!("module '{}' produced {} fields", name, data.len());
                    Ok(data)
                }
                Err(e) => {
                    error!("module '{}' failed: {}", name, e);
                    get_metrics().await.module_failures.with_label_values(&[name.as_str()]).inc();
                    Err(e.context(format!("module '{}' failed", name)))
                }
            }
        }
    });

    let results = try_join_all(pending).await?;
    Ok(merge_ordered(results))
}
