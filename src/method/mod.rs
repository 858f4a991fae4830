pub mod resolver;

pub use resolver::{convert_legacy, detect_method};
