//! Version control backends
//!
//! A unified project interface over Perforce (P4) and Git working copies.
pub mod backend_config;
pub mod git_project;
pub mod p4_project;
pub mod project_factory;
pub mod vcs_interface;

pub use backend_config::BackendConfig;
pub use git_project::GitProject;
pub use p4_project::P4Project;
pub use project_factory::ProjectFactory;
pub use vcs_interface::{ChangedFiles, VersionControlProject};
