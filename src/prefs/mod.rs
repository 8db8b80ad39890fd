//! Preference store
//!
//! Small typed key/value store persisted as JSON. Holds the mirror grant
//! token, the global defaults baseline, custom-cover flags and onboarding
//! choices.

pub mod keys;
mod store;

pub use store::{PrefValue, Preferences};
