//! Infrastructure layer modules
//!
//! This layer provides concrete implementations for external system interactions:
//! - Process execution (streamed subprocess output)
//! - File system operations (file probes, manifests)
//! - Version control backends (Perforce, Git)
pub mod filesystem;
pub mod process;
pub mod vcs;

// Re-export commonly used types
pub use filesystem::{FileProbe, ManifestStore};
pub use process::{CommandLine, ProcessError, ProcessRunner};
pub use vcs::{BackendConfig, ProjectFactory, VersionControlProject};
