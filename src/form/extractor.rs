use serde_json::{Map, Value};
use tracing::debug;

use crate::form::FormSource;
use crate::method::resolver::INSTRUMENT_FIELDS;
use crate::utils::constants::{DEFAULT_ATTR_KEY, FIELD_BILLING_ADDRESS, FIELD_PAYMENT_INSTRUMENT};

/// Payment instrument and billing address read from a form.
/// An empty bucket is `None`, never an empty map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedForm {
    pub payment_instrument: Option<Map<String, Value>>,
    pub billing_address: Option<Map<String, Value>>,
}

impl ExtractedForm {
    /// Token data with both buckets, empty ones serialized as `null`.
    pub fn into_data(self) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert(
            FIELD_PAYMENT_INSTRUMENT.to_owned(),
            self.payment_instrument.map(Value::Object).unwrap_or(Value::Null),
        );
        data.insert(
            FIELD_BILLING_ADDRESS.to_owned(),
            self.billing_address.map(Value::Object).unwrap_or(Value::Null),
        );
        data
    }
}

#[derive(Debug, Clone)]
pub struct FormExtractor {
    attr_key: String,
}

impl Default for FormExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_ATTR_KEY)
    }
}

impl FormExtractor {
    pub fn new(attr_key: impl Into<String>) -> Self {
        Self { attr_key: attr_key.into() }
    }

    pub fn extract(&self, form: &dyn FormSource) -> ExtractedForm {
        let mut payment_instrument = Map::new();
        let mut billing_address = Map::new();

        for field in form.fields() {
            let Some(prop) = field.attribute(&self.attr_key).filter(|p| !p.is_empty()) else {
                continue;
            };
            let Some(value) = field.value().map(trim_value).filter(|v| !v.is_empty()) else {
                debug!("skipping empty form field '{}'", prop);
                continue;
            };
            let bucket = if INSTRUMENT_FIELDS.contains(&prop) {
                &mut payment_instrument
            } else {
                &mut billing_address
            };
            bucket.insert(prop.to_owned(), Value::String(value.to_owned()));
        }

        ExtractedForm {
            payment_instrument: Some(payment_instrument).filter(|m| !m.is_empty()),
            billing_address: Some(billing_address).filter(|m| !m.is_empty()),
        }
    }
}

/// Strips whitespace, BOM and no-break spaces at both ends.
fn trim_value(value: &str) -> &str {
    value.trim_matches(is_form_space)
}

/// Line terminators and the Unicode space separators, BOM included.
/// U+0085 (NEL) is kept.
fn is_form_space(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{B}' | '\u{C}' | '\r' | ' ' | '\u{A0}' | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}' | '\u{2029}' | '\u{202F}' | '\u{205F}' | '\u{3000}' | '\u{FEFF}'
    )
}
