pub mod common;

mod module_aggregation;
mod reqwest_transport;
