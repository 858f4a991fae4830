pub mod builder;

pub use builder::{build_request, Credentials, RequestConfig};
