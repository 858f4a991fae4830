pub mod token_handler;

pub use token_handler::{Completion, HandlerConfig, Rejection, TokenHandler, TokenPayload};
