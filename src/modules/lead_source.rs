use anyhow::{Context, Result};
use serde_json::{Map, Value};
use url::Url;

use crate::modules::{DataModule, ModuleData, ModuleFuture};
use crate::utils::constants::FIELD_LEAD_SOURCE;

/// query parameter -> leadSource property
const QUERY_TAGS: [(&str, &str); 8] = [
    ("utm_source", "source"),
    ("utm_medium", "medium"),
    ("utm_campaign", "campaign"),
    ("utm_term", "term"),
    ("utm_content", "content"),
    ("affiliate", "affiliate"),
    ("subAffiliate", "subAffiliate"),
    ("clickId", "clickId"),
];

/// Tags the token with the marketing attribution of the landing page.
#[derive(Debug, Clone)]
pub struct LeadSourceModule {
    lead_source: Map<String, Value>,
}

impl LeadSourceModule {
    pub fn from_url(landing_url: &str, referrer: Option<String>) -> Result<Self> {
        let url = Url::parse(landing_url)
            .with_context(|| format!("invalid lead source url '{}'", landing_url))?;

        let mut lead_source = Map::new();
        for (key, value) in url.query_pairs() {
            let Some((_, property)) = QUERY_TAGS.iter().find(|(param, _)| *param == key) else {
                continue;
            };
            if !value.is_empty() {
                lead_source.insert(property.to_string(), Value::String(value.into_owned()));
            }
        }

        // path and referrer describe the visit, only worth sending next to a tag
        if !lead_source.is_empty() {
            lead_source.insert("path".to_owned(), Value::String(url.path().to_owned()));
            if let Some(referrer) = referrer.filter(|r| !r.is_empty()) {
                lead_source.insert("referrer".to_owned(), Value::String(referrer));
            }
        }
        Ok(Self { lead_source })
    }

    pub fn lead_source(&self) -> &Map<String, Value> {
        &self.lead_source
    }
}

impl DataModule for LeadSourceModule {
    fn name(&self) -> &str {
        "lead_source"
    }

    fn collect(&self) -> ModuleFuture {
        let mut data = ModuleData::new();
        if !self.lead_source.is_empty() {
            data.insert(FIELD_LEAD_SOURCE.to_owned(), Value::Object(self.lead_source.clone()));
        }
        Box::pin(async move { Ok(data) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn utm_parameters_become_lead_source_properties() {
        let module = LeadSourceModule::from_url(
            "https://shop.example.com/checkout?utm_source=google&utm_campaign=spring&page=2",
            Some("https://google.com".to_owned()),
        )
        .unwrap();

        let data = module.collect().await.unwrap();
        let lead_source = data[FIELD_LEAD_SOURCE].as_object().unwrap();
        assert_eq!(lead_source["source"], "google");
        assert_eq!(lead_source["campaign"], "spring");
        assert_eq!(lead_source["path"], "/checkout");
        assert_eq!(lead_source["referrer"], "https://google.com");
        assert!(lead_source.get("page").is_none());
    }

    #[tokio::test]
    async fn untagged_url_contributes_nothing() {
        let module = LeadSourceModule::from_url("https://shop.example.com/?utm_source=", None).unwrap();
        assert!(module.lead_source().is_empty());
        assert!(module.collect().await.unwrap().is_empty());
    }

    #[test]
    fn invalid_url_is_an_error() {
        assert!(LeadSourceModule::from_url("not a url", None).is_err());
    }
}
