//! Local file system helpers
pub mod file_probe;
pub mod manifest_store;

pub use file_probe::{FileProbe, BINARY_CHECK_LIMIT};
pub use manifest_store::{ManifestStore, ManifestStoreError};
