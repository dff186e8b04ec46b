use std::path::{Path, PathBuf};

use crate::common::error::SyncError;
use crate::common::result::SyncResult;
use crate::domain::value_objects::project_type::ProjectType;

/// Locations of the backend command-line tools
///
/// Resolved once (normally from the environment) and handed to project
/// constructors, so nothing reads process-wide state after start-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    p4_bin: Option<PathBuf>,
    git_bin: Option<PathBuf>,
}

impl BackendConfig {
    /// Read `VCSYNC_P4_BIN` and `VCSYNC_GIT_BIN`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        for project_type in ProjectType::ALL {
            if let Some(path) = lookup(project_type.binary_env_var()).filter(|v| !v.is_empty()) {
                config = config.with_binary(project_type, path);
            }
        }
        config
    }

    pub fn with_binary(mut self, project_type: ProjectType, path: impl Into<PathBuf>) -> Self {
        let path = Some(path.into());
        match project_type {
            ProjectType::P4 => self.p4_bin = path,
            ProjectType::Git => self.git_bin = path,
        }
        self
    }

    /// Binary for `project_type`, or [`SyncError::BackendNotConfigured`]
    pub fn binary(&self, project_type: ProjectType) -> SyncResult<&Path> {
        let path = match project_type {
            ProjectType::P4 => self.p4_bin.as_deref(),
            ProjectType::Git => self.git_bin.as_deref(),
        };
        path.ok_or_else(|| SyncError::backend_not_configured(project_type))
    }

    pub fn is_configured(&self, project_type: ProjectType) -> bool {
        self.binary(project_type).is_ok()
    }
}
