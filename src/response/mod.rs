pub mod normalizer;

pub use normalizer::{handle_response, ResultEnvelope};
