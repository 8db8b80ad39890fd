//! Onboarding readiness
//!
//! A fixed, ordered list of prerequisites, each evaluated fresh from current
//! storage and preference state. Nothing here is persisted, so callers may
//! poll as often as they like.

pub mod firmware;
mod tracker;

pub use firmware::is_firmware_file;
pub use tracker::{ReadinessStep, ReadinessTracker, StepStatus};
