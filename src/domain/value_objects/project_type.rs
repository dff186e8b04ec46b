use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version control backend a project is synchronized from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Perforce (P4)
    P4,
    /// Git
    Git,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = ProjectTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "p4" | "perforce" => Ok(ProjectType::P4),
            "git" => Ok(ProjectType::Git),
            _ => Err(ProjectTypeError::Unsupported(s.to_string())),
        }
    }
}

impl ProjectType {
    /// Every supported backend
    pub const ALL: [ProjectType; 2] = [ProjectType::P4, ProjectType::Git];

    /// Stable discriminator ("p4", "git")
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectType::P4 => "p4",
            ProjectType::Git => "git",
        }
    }

    /// Metadata directory the backend keeps inside a working copy
    pub fn metadata_dir(&self) -> &'static str {
        match self {
            ProjectType::P4 => ".p4",
            ProjectType::Git => ".git",
        }
    }

    /// Environment variable holding the location of the backend binary
    pub fn binary_env_var(&self) -> &'static str {
        match self {
            ProjectType::P4 => "VCSYNC_P4_BIN",
            ProjectType::Git => "VCSYNC_GIT_BIN",
        }
    }
}

/// Errors raised while parsing a project type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectTypeError {
    #[error("Unsupported project type: '{0}'. Supported types are: p4, git")]
    Unsupported(String),
}
