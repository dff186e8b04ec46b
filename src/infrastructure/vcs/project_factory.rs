use std::collections::HashMap;
use std::path::PathBuf;

use super::backend_config::BackendConfig;
use super::git_project::GitProject;
use super::p4_project::P4Project;
use super::vcs_interface::VersionControlProject;
use crate::common::result::SyncResult;
use crate::domain::entities::manifest::ProjectEntry;
use crate::domain::value_objects::project_type::ProjectType;

/// Factory for building project instances from a [`ProjectType`]
pub struct ProjectFactory;

impl ProjectFactory {
    /// Create the backend implementation for `project_type`
    pub fn create_project(
        project_type: ProjectType,
        name: impl Into<String>,
        base_dir: impl Into<PathBuf>,
        options: &HashMap<String, String>,
        backend: &BackendConfig,
    ) -> SyncResult<Box<dyn VersionControlProject>> {
        match project_type {
            ProjectType::P4 => Ok(Box::new(P4Project::new(name, base_dir, options, backend)?)),
            ProjectType::Git => Ok(Box::new(GitProject::new(name, base_dir, options, backend)?)),
        }
    }

    /// Create a project from a manifest entry
    pub fn from_entry(
        entry: &ProjectEntry,
        backend: &BackendConfig,
    ) -> SyncResult<Box<dyn VersionControlProject>> {
        Self::create_project(
            entry.project_type,
            entry.name.clone(),
            entry.base_dir.clone(),
            &entry.options,
            backend,
        )
    }
}
