//! Error handling
//!
//! Defines the error taxonomy and the handler used for absorbed mirror failures.

pub mod handlers;
pub mod types;

pub use handlers::log_mirror_failure;
pub use types::*;
