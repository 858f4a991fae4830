//! Shared constants and invariants

pub const DEFAULT_ENDPOINT: &str = "https://api.rebilly.com/v2.1/tokens";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

/// the only status the tokens endpoint answers with on success
pub const SUCCESS_STATUS: u16 = 201;
pub const SUCCESS_MSG: &str = "success";

// Outbound headers
pub const HEADER_API_CONSUMER: &str = "reb-api-consumer";
pub const HEADER_LEGACY_AUTH: &str = "reb-auth";
pub const SDK_NAME: &str = "RebillySDK/JS-Token";
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

// Form binding
pub const DEFAULT_ATTR_KEY: &str = "data-rebilly";

// Token data fields
pub const FIELD_METHOD: &str = "method";
pub const FIELD_PAYMENT_INSTRUMENT: &str = "paymentInstrument";
pub const FIELD_BILLING_ADDRESS: &str = "billingAddress";
pub const FIELD_LEAD_SOURCE: &str = "leadSource";
