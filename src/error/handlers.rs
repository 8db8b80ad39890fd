//! Error handlers
//!
//! Mirror-path failures never reach the caller; they end here.

use crate::error::types::StoreError;
use log::warn;

/// Log a mirror failure that is being absorbed
pub fn log_mirror_failure(context: &str, err: &StoreError) {
    warn!("Mirror write skipped for {}: {}", context, err);
}
