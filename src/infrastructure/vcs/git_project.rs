use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

use super::backend_config::BackendConfig;
use super::vcs_interface::{
    inspect_working_copy, validate_base_dir, ChangedFiles, VersionControlProject, WorkingCopyState,
};
use crate::common::error::SyncError;
use crate::common::result::{OptionsExt, SyncResult};
use crate::domain::value_objects::project_type::ProjectType;
use crate::infrastructure::process::{CommandLine, ProcessRunner};

/// Git working copy that always tracks `origin/<branch>`
///
/// Updates hard-reset the working copy, so local modifications are discarded.
#[derive(Debug, Clone)]
pub struct GitProject {
    name: String,
    base_dir: PathBuf,
    url: String,
    branch: Option<String>,
    git_executable: PathBuf,
}

impl GitProject {
    /// Create a project from its `Url` and optional `Branch` options
    pub fn new(
        name: impl Into<String>,
        base_dir: impl Into<PathBuf>,
        options: &HashMap<String, String>,
        backend: &BackendConfig,
    ) -> SyncResult<Self> {
        let name = name.into();
        let base_dir = base_dir.into();
        let git_executable = backend.binary(ProjectType::Git)?.to_path_buf();
        validate_base_dir(&name, &base_dir)?;

        let url = options.required(&name, "Url")?;
        let branch = options.optional("Branch");
        if branch.is_none() {
            warn!(project = %name, "missing Branch; using the remote default");
        }

        Ok(Self {
            name,
            base_dir,
            url,
            branch,
            git_executable,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Configured branch, or the one detected after the first clone/update
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    fn git(&self) -> CommandLine {
        CommandLine::new(self.git_executable.to_string_lossy())
    }

    /// `git -C <base_dir>`
    fn git_in_working_copy(&self) -> CommandLine {
        self.git()
            .arg("-C")
            .arg(self.base_dir.to_string_lossy())
    }

    fn clone_command(&self) -> CommandLine {
        let command = self.git().arg("clone").arg(&self.url);
        let command = match &self.branch {
            Some(branch) => command.arg("-b").arg(branch),
            None => command,
        };
        command.arg(self.base_dir.to_string_lossy())
    }

    async fn run(&self, command: CommandLine) -> SyncResult<()> {
        info!(project = %self.name, command = %command, "git");
        let log_line = |line: &str| debug!(project = %self.name, "git: {}", line);
        ProcessRunner::run_command_lines(&command, Some(&log_line)).await?;
        Ok(())
    }

    /// Ask git which branch is checked out
    async fn detect_branch(&self) -> SyncResult<String> {
        let command = self.git_in_working_copy().arg("branch");
        debug!(project = %self.name, command = %command, "detecting branch");

        let detected = Mutex::new(None);
        let on_line = |line: &str| {
            if let Some(branch) = parse_current_branch(line) {
                if let Ok(mut slot) = detected.lock() {
                    *slot = Some(branch.to_string());
                }
            }
        };
        ProcessRunner::run_command_lines(&command, Some(&on_line)).await?;

        detected
            .into_inner()
            .ok()
            .flatten()
            .ok_or_else(|| SyncError::BranchUnknown {
                project: self.name.clone(),
            })
    }

    async fn clone_repository(&mut self) -> SyncResult<ChangedFiles> {
        self.run(self.clone_command()).await?;

        if self.branch.is_none() {
            let branch = self.detect_branch().await?;
            info!(project = %self.name, branch = %branch, "detected branch");
            self.branch = Some(branch);
        }
        Ok(ChangedFiles::new())
    }

    async fn update_repository(&mut self) -> SyncResult<ChangedFiles> {
        self.run(self.git_in_working_copy().args(["fetch", "--all"]))
            .await?;

        let branch = match self.branch.clone() {
            Some(branch) => branch,
            None => {
                let branch = self.detect_branch().await?;
                info!(project = %self.name, branch = %branch, "detected branch");
                self.branch = Some(branch.clone());
                branch
            }
        };

        self.run(
            self.git_in_working_copy()
                .args(["reset", "--hard"])
                .arg(format!("origin/{}", branch)),
        )
        .await?;
        Ok(ChangedFiles::new())
    }
}

/// Branch name from a `git branch` line marked as current (`* main`)
///
/// Detached heads (`* (HEAD detached at 1a2b3c)`) yield `None`.
pub fn parse_current_branch(line: &str) -> Option<&str> {
    if !line.starts_with("* ") {
        return None;
    }
    line.split_whitespace()
        .nth(1)
        .filter(|branch| !branch.starts_with('('))
}

#[async_trait]
impl VersionControlProject for GitProject {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn project_type(&self) -> ProjectType {
        ProjectType::Git
    }

    async fn sync(&mut self) -> SyncResult<ChangedFiles> {
        match inspect_working_copy(&self.name, &self.base_dir).await? {
            WorkingCopyState::Missing => self.clone_repository().await,
            WorkingCopyState::Directory => self.update_repository().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn backend() -> BackendConfig {
        BackendConfig::default().with_binary(ProjectType::Git, "/usr/bin/git")
    }

    fn options(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_current_branch() {
        assert_eq!(parse_current_branch("* main"), Some("main"));
        assert_eq!(parse_current_branch("* feature/x"), Some("feature/x"));
        assert_eq!(parse_current_branch("  develop"), None);
        assert_eq!(parse_current_branch("* (HEAD detached at 1a2b3c4)"), None);
        assert_eq!(parse_current_branch(""), None);
    }

    #[test]
    fn test_new_requires_url() {
        let result = GitProject::new("core", "/srv/core", &options(&[]), &backend());
        match result {
            Err(SyncError::MissingOption { option, .. }) => assert_eq!(option, "Url"),
            other => panic!("Expected MissingOption, got {:?}", other),
        }
    }

    #[test]
    fn test_new_without_binary_fails() {
        let opts = options(&[("Url", "https://example.com/core.git")]);
        let result = GitProject::new("core", "/srv/core", &opts, &BackendConfig::default());
        assert!(matches!(result, Err(SyncError::BackendNotConfigured { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_new_rejects_non_utf8_base_dir() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let opts = options(&[("Url", "https://example.com/core.git")]);
        let base_dir = Path::new(OsStr::from_bytes(b"/srv/\xffcore"));
        let result = GitProject::new("core", base_dir, &opts, &backend());
        assert!(matches!(result, Err(SyncError::InvalidBaseDir { .. })));
    }

    #[test]
    fn test_branch_is_optional() {
        let opts = options(&[("Url", "https://example.com/core.git")]);
        let project = GitProject::new("core", "/srv/core", &opts, &backend()).unwrap();
        assert_eq!(project.branch(), None);

        let opts = options(&[("Url", "https://example.com/core.git"), ("Branch", "release")]);
        let project = GitProject::new("core", "/srv/core", &opts, &backend()).unwrap();
        assert_eq!(project.branch(), Some("release"));
    }

    #[test]
    fn test_clone_command() {
        let opts = options(&[("Url", "https://example.com/core.git")]);
        let project = GitProject::new("core", "/srv/core", &opts, &backend()).unwrap();
        assert_eq!(
            project.clone_command().to_string(),
            "/usr/bin/git clone https://example.com/core.git /srv/core"
        );

        let opts = options(&[("Url", "https://example.com/core.git"), ("Branch", "release")]);
        let project = GitProject::new("core", "/srv/core", &opts, &backend()).unwrap();
        assert_eq!(
            project.clone_command().to_string(),
            "/usr/bin/git clone https://example.com/core.git -b release /srv/core"
        );
    }

    #[tokio::test]
    async fn test_content_access_is_unsupported() {
        let opts = options(&[("Url", "https://example.com/core.git")]);
        let project = GitProject::new("core", "/srv/core", &opts, &backend()).unwrap();

        for result in [
            project.byte_length("README.md", "HEAD").await.map(|_| ()),
            project.content_hash("README.md", "HEAD").await.map(|_| ()),
            project.commit_info("README.md", "HEAD").await.map(|_| ()),
            project
                .read_binary_range("README.md", "HEAD", 0, 16)
                .await
                .map(|_| ()),
        ] {
            assert!(matches!(
                result,
                Err(SyncError::UnsupportedOperation {
                    project_type: ProjectType::Git,
                    ..
                })
            ));
        }
    }
}
