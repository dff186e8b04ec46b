pub mod manifest;

pub use manifest::{Manifest, ProjectEntry};
