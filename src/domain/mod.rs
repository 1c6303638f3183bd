//! Domain logic - pure value types independent of files and git

pub mod occurrence;
pub mod tag;
pub mod version;

pub use occurrence::VersionOccurrence;
pub use tag::{TagName, TagPattern};
pub use version::{Version, VersionBump};
