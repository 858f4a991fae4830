use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::settings::SettingsConfig;
use crate::utils::constants::DEFAULT_ENDPOINT;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    /// enrichment modules, run in declaration order
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,
}

/// ================================
/// Authentication
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AuthConfig {
    /// legacy `reb-auth` signature
    pub authorization: Option<String>,
    /// publishable API key, sent as `Authorization: Bearer <key>`
    pub publishable_key: Option<String>,
}

/// ================================
/// Modules
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModuleConfig {
    Static {
        fields: Map<String, Value>,
    },
    LeadSource {
        url: String,
        referrer: Option<String>,
    },
}

fn default_endpoint() -> Option<String> {
    Some(DEFAULT_ENDPOINT.to_owned())
}
