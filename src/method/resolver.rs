use serde_json::{Map, Value};
use tracing::info;

use crate::helpers::value::field_is_truthy;
use crate::utils::constants::{FIELD_METHOD, FIELD_PAYMENT_INSTRUMENT};

pub const PAYMENT_CARD: &str = "payment-card";
pub const ACH: &str = "ach";

pub const CARD_FIELDS: [&str; 4] = ["pan", "expMonth", "expYear", "cvv"];
pub const ACH_FIELDS: [&str; 3] = ["routingNumber", "accountNumber", "accountType"];

/// Every payment instrument field, card fields first.
pub const INSTRUMENT_FIELDS: [&str; 7] = [
    // payment card
    "pan", "expMonth", "expYear", "cvv",
    // ach
    "routingNumber", "accountNumber", "accountType",
];

/// legacy identifier -> current identifier
const LEGACY_METHODS: [(&str, &str); 2] = [
    ("payment_card", PAYMENT_CARD),
    ("bank_account", ACH),
];

/// Detection order matters: the first family with a matching field wins.
const METHOD_FIELDS: [(&str, &[&str]); 2] = [
    (PAYMENT_CARD, &CARD_FIELDS),
    (ACH, &ACH_FIELDS),
];

/// Rewrite a legacy `method` value to its current equivalent.
pub fn convert_legacy(data: &mut Map<String, Value>) {
    let Some(Value::String(method)) = data.get_mut(FIELD_METHOD) else {
        return;
    };
    if let Some((_, current)) = LEGACY_METHODS.iter().find(|(legacy, _)| *legacy == method.as_str()) {
        *method = current.to_string();
    }
}

/// Infer `method` from the payment instrument fields when it is absent.
/// Returns the detected method, an existing method is never overwritten.
pub fn detect_method(data: &mut Map<String, Value>) -> Option<&'static str> {
    if field_is_truthy(data, FIELD_METHOD) {
        return None;
    }
    let fields: Vec<&str> = match data.get(FIELD_PAYMENT_INSTRUMENT) {
        Some(Value::Object(instrument)) => instrument.keys().map(String::as_str).collect(),
        _ => Vec::new(),
    };

    let detected = METHOD_FIELDS
        .iter()
        .find(|(_, family)| fields.iter().any(|field| family.contains(field)))
        .map(|(method, _)| *method)?;

    data.insert(FIELD_METHOD.to_owned(), Value::String(detected.to_owned()));
    info!("Rebilly detected \"{}\" as the payment method", detected);
    Some(detected)
}
