//! Asset import
//!
//! Copies user-selected patch/cheat documents and cover images into
//! entity-keyed locations, keeping the primary and mirror roots in step.

pub mod cover;
mod importer;
pub mod results;

pub use cover::{COVER_HEIGHT, COVER_WIDTH, CoverCache, NoopCoverCache, render_cover};
pub use importer::AssetImporter;
pub use results::{DocumentKind, ImportOutcome};
