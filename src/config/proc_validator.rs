//! Configuration validation with aggregated errors.
//! Every problem is collected so a broken config file is fixed in one pass.

use tracing::{error, info, warn};
use url::Url;

use crate::config::service::{ModuleConfig, ServiceConfig};
use crate::config::settings::SettingsConfig;
use crate::observability::metrics::get_metrics;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);

    if let Some(endpoint) = &cfg.endpoint {
        validate_http_url("endpoint", endpoint, &mut errors);
    }

    if cfg.auth.authorization.is_some() && cfg.auth.publishable_key.is_some() {
        warn!("both auth.authorization and auth.publishable_key are set, the publishable key is used");
    }

    for (idx, module) in cfg.modules.iter().enumerate() {
        match module {
            ModuleConfig::Static { fields } => {
                if fields.is_empty() {
                    errors.push(format!("modules[{}]: static module has no fields", idx));
                }
            }
            ModuleConfig::LeadSource { url, referrer } => {
                validate_http_url(&format!("modules[{}].url", idx), url, &mut errors);
                if let Some(referrer) = referrer {
                    validate_http_url(&format!("modules[{}].referrer", idx), referrer, &mut errors);
                }
            }
        }
    }

    if errors.is_empty() {
        info!("config is valid");
        Ok(())
    } else {
        let metrics = get_metrics().await;
        for e in &errors {
            error!("config validation: {}", e);
            metrics.config_validation_errors.inc();
        }
        Err(errors)
    }
}

fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.timeout_ms == Some(0) {
        errors.push("settings.timeout_ms must be greater than 0".to_string());
    }
    if let Some(logging) = &settings.logging {
        let level = logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' is not one of {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }
}

fn validate_http_url(field: &str, value: &str, errors: &mut Vec<String>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(format!(
            "{}: unsupported scheme '{}' in '{}'",
            field,
            url.scheme(),
            value
        )),
        Err(e) => errors.push(format!("{}: invalid url '{}': {}", field, value, e)),
    }
}
