use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::project_type::ProjectType;
use crate::infrastructure::filesystem::manifest_store::ManifestStoreError;
use crate::infrastructure::process::ProcessError;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Project '{project}' is missing required option '{option}'")]
    MissingOption { project: String, option: String },

    #[error("Cannot find {project_type} command: set {env_var} to the binary location")]
    BackendNotConfigured {
        project_type: ProjectType,
        env_var: &'static str,
    },

    #[error("Project '{project}' base directory must be an absolute UTF-8 path: {}", .path.display())]
    InvalidBaseDir { project: String, path: PathBuf },

    #[error("Project '{project}' cannot sync since \"{}\" is not a directory", .path.display())]
    NotADirectory { project: String, path: PathBuf },

    #[error("Project '{project}': unable to determine the checked-out branch")]
    BranchUnknown { project: String },

    #[error("Unsupported operation for {project_type}: {operation}")]
    UnsupportedOperation {
        project_type: ProjectType,
        operation: String,
    },

    #[error("Command execution failed: {0}")]
    Process(#[from] ProcessError),

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Manifest error: {0}")]
    ManifestError(#[from] ManifestStoreError),

    #[error("Validation error: {field} - {message}")]
    ValidationError { field: String, message: String },
}

impl SyncError {
    pub fn missing_option(project: impl Into<String>, option: impl Into<String>) -> Self {
        Self::MissingOption {
            project: project.into(),
            option: option.into(),
        }
    }

    pub fn backend_not_configured(project_type: ProjectType) -> Self {
        Self::BackendNotConfigured {
            project_type,
            env_var: project_type.binary_env_var(),
        }
    }

    pub fn not_a_directory(project: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::NotADirectory {
            project: project.into(),
            path: path.into(),
        }
    }

    pub fn unsupported_operation(project_type: ProjectType, operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            project_type,
            operation: operation.into(),
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn validation_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for errors raised while building a project rather than while syncing one.
    ///
    /// These never go away on their own, so retrying them is pointless.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::MissingOption { .. }
                | Self::BackendNotConfigured { .. }
                | Self::InvalidBaseDir { .. }
                | Self::ValidationError { .. }
        )
    }
}

impl From<std::io::Error> for SyncError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_option_message() {
        let error = SyncError::missing_option("depot", "P4USER");
        assert_eq!(
            error.to_string(),
            "Project 'depot' is missing required option 'P4USER'"
        );
        assert!(error.is_misconfiguration());
    }

    #[test]
    fn test_backend_not_configured_names_env_var() {
        let error = SyncError::backend_not_configured(ProjectType::Git);
        assert!(error.to_string().contains("VCSYNC_GIT_BIN"));
        assert!(error.is_misconfiguration());
    }

    #[test]
    fn test_not_a_directory_is_not_misconfiguration() {
        let error = SyncError::not_a_directory("core", "/srv/core");
        assert!(matches!(error, SyncError::NotADirectory { .. }));
        assert!(!error.is_misconfiguration());
    }

    #[test]
    fn test_process_error_conversion() {
        let error: SyncError = ProcessError::InvalidCommand("empty".to_string()).into();
        assert!(matches!(error, SyncError::Process(_)));
    }

    #[test]
    fn test_error_conversion_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: SyncError = io_error.into();
        assert!(matches!(error, SyncError::FileSystemError { .. }));
    }
}
