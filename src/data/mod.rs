pub mod combine;

pub use combine::{combine, merge_ordered};
