//! Storage result types
//!
//! Primary and mirror writes produce independent results; `settle` joins
//! them so mirror failures stay invisible to the caller.

use crate::error::{StoreError, log_mirror_failure};

/// Result of the best-effort mirror step
#[derive(Debug)]
pub enum MirrorOutcome {
    Written,
    /// No mirror root is configured
    Skipped,
    Failed(StoreError),
}

impl MirrorOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, MirrorOutcome::Written)
    }
}

/// Join a primary result with its mirror outcome. Mirror failures are
/// logged and dropped; the primary result is returned as is.
pub fn settle<T>(
    context: &str,
    primary: Result<T, StoreError>,
    mirror: MirrorOutcome,
) -> Result<T, StoreError> {
    if let MirrorOutcome::Failed(e) = &mirror {
        log_mirror_failure(context, e);
    }
    primary
}
