use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use crate::common::error::SyncError;
use crate::common::result::SyncResult;
use crate::domain::value_objects::project_type::ProjectType;

/// Repository-relative path mapped to its latest modification marker
pub type ChangedFiles = HashMap<String, String>;

/// What `sync` found at a project's base directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingCopyState {
    /// Nothing there yet; a clone is needed
    Missing,
    /// An existing directory; an update is needed
    Directory,
}

/// Reject base directories that are not absolute UTF-8 paths
///
/// Command lines carry paths as strings, so a non-UTF-8 path could not
/// reach the backend unchanged.
pub(crate) fn validate_base_dir(project: &str, base_dir: &Path) -> SyncResult<()> {
    if base_dir.is_absolute() && base_dir.to_str().is_some() {
        Ok(())
    } else {
        Err(SyncError::InvalidBaseDir {
            project: project.to_string(),
            path: base_dir.to_path_buf(),
        })
    }
}

/// Classify `base_dir`, failing if it exists but is not a directory
pub async fn inspect_working_copy(project: &str, base_dir: &Path) -> SyncResult<WorkingCopyState> {
    match tokio::fs::metadata(base_dir).await {
        Ok(metadata) if metadata.is_dir() => Ok(WorkingCopyState::Directory),
        Ok(_) => Err(SyncError::not_a_directory(project, base_dir)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(WorkingCopyState::Missing),
        Err(e) => Err(SyncError::filesystem_error_with_source(
            format!("cannot inspect working copy of '{}'", project),
            Some(base_dir.to_path_buf()),
            e,
        )),
    }
}

/// A working copy synchronized from one version control backend
///
/// Implemented by [`super::p4_project::P4Project`] and
/// [`super::git_project::GitProject`]. The content-access methods address
/// files by repository-relative path and revision; backends that cannot
/// serve them report [`SyncError::UnsupportedOperation`].
#[async_trait]
pub trait VersionControlProject: Send + Sync {
    /// Logical project name
    fn name(&self) -> &str;

    /// Absolute path of the working copy
    fn base_dir(&self) -> &Path;

    /// Backend discriminator
    fn project_type(&self) -> ProjectType;

    /// Clone the working copy if it is missing, update it otherwise
    ///
    /// Safe to call repeatedly. The returned map is empty until a backend
    /// tracks per-file changes.
    async fn sync(&mut self) -> SyncResult<ChangedFiles>;

    /// Post-sync processing hook
    async fn compile(&self) -> SyncResult<()> {
        Ok(())
    }

    async fn read_text(&self, _path: &str, _revision: &str) -> SyncResult<String> {
        Err(SyncError::unsupported_operation(self.project_type(), "read_text"))
    }

    /// Bytes `start..end` of a file at `revision`
    async fn read_binary_range(
        &self,
        _path: &str,
        _revision: &str,
        _start: u64,
        _end: u64,
    ) -> SyncResult<Vec<u8>> {
        Err(SyncError::unsupported_operation(
            self.project_type(),
            "read_binary_range",
        ))
    }

    async fn byte_length(&self, _path: &str, _revision: &str) -> SyncResult<u64> {
        Err(SyncError::unsupported_operation(self.project_type(), "byte_length"))
    }

    async fn content_hash(&self, _path: &str, _revision: &str) -> SyncResult<String> {
        Err(SyncError::unsupported_operation(self.project_type(), "content_hash"))
    }

    /// Blame annotations for lines `start_line..=end_line`
    async fn blame_range(
        &self,
        _path: &str,
        _revision: &str,
        _start_line: usize,
        _end_line: usize,
    ) -> SyncResult<Vec<String>> {
        Err(SyncError::unsupported_operation(self.project_type(), "blame_range"))
    }

    async fn commit_info(&self, _path: &str, _revision: &str) -> SyncResult<Vec<String>> {
        Err(SyncError::unsupported_operation(self.project_type(), "commit_info"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_base_dir() {
        assert!(validate_base_dir("p", Path::new("/srv/p")).is_ok());
        assert!(matches!(
            validate_base_dir("p", Path::new("srv/p")),
            Err(SyncError::InvalidBaseDir { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_base_dir_rejects_non_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let base_dir = Path::new(OsStr::from_bytes(b"/srv/caf\xe9"));
        assert!(matches!(
            validate_base_dir("p", base_dir),
            Err(SyncError::InvalidBaseDir { .. })
        ));
    }

    #[tokio::test]
    async fn test_inspect_missing_directory() {
        let dir = TempDir::new().unwrap();
        let state = inspect_working_copy("p", &dir.path().join("absent"))
            .await
            .unwrap();
        assert_eq!(state, WorkingCopyState::Missing);
    }

    #[tokio::test]
    async fn test_inspect_existing_directory() {
        let dir = TempDir::new().unwrap();
        let state = inspect_working_copy("p", dir.path()).await.unwrap();
        assert_eq!(state, WorkingCopyState::Directory);
    }

    #[tokio::test]
    async fn test_inspect_regular_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("occupied");
        std::fs::write(&file, "not a directory").unwrap();

        let result = inspect_working_copy("p", &file).await;
        assert!(matches!(result, Err(SyncError::NotADirectory { .. })));
    }
}
