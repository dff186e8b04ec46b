use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs::DirBuilder;
use tracing::info;

use super::backend_config::BackendConfig;
use super::vcs_interface::{
    inspect_working_copy, validate_base_dir, ChangedFiles, VersionControlProject, WorkingCopyState,
};
use crate::common::error::SyncError;
use crate::common::result::{OptionsExt, ResultExt, SyncResult};
use crate::domain::value_objects::project_type::ProjectType;
use crate::infrastructure::process::{CommandLine, ProcessRunner};

/// Name of the p4 config file inside the `.p4` metadata directory
pub const P4_CONFIG_FILE: &str = "config";

/// Perforce working copy
#[derive(Debug, Clone)]
pub struct P4Project {
    name: String,
    base_dir: PathBuf,
    port: String,
    user: String,
    client: String,
    p4_executable: PathBuf,
}

impl P4Project {
    /// Create a project from its `P4PORT`, `P4USER` and `P4CLIENT` options
    pub fn new(
        name: impl Into<String>,
        base_dir: impl Into<PathBuf>,
        options: &HashMap<String, String>,
        backend: &BackendConfig,
    ) -> SyncResult<Self> {
        let name = name.into();
        let base_dir = base_dir.into();
        let p4_executable = backend.binary(ProjectType::P4)?.to_path_buf();
        validate_base_dir(&name, &base_dir)?;

        let port = options.required(&name, "P4PORT")?;
        let user = options.required(&name, "P4USER")?;
        let client = options.required(&name, "P4CLIENT")?;

        Ok(Self {
            name,
            base_dir,
            port,
            user,
            client,
            p4_executable,
        })
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    /// Metadata directory holding the p4 config file
    pub fn config_dir(&self) -> PathBuf {
        self.base_dir.join(ProjectType::P4.metadata_dir())
    }

    /// Path of the `.p4/config` file written on first sync
    pub fn config_path(&self) -> PathBuf {
        self.config_dir().join(P4_CONFIG_FILE)
    }

    fn sync_command(&self, force: bool) -> CommandLine {
        let command = CommandLine::new(self.p4_executable.to_string_lossy())
            .env("P4PORT", &self.port)
            .env("P4USER", &self.user)
            .env("P4CLIENT", &self.client)
            .arg("sync");
        if force {
            command.arg("-f")
        } else {
            command
        }
    }

    async fn run_sync(&self, force: bool) -> SyncResult<()> {
        let command = self.sync_command(force);
        info!(project = %self.name, command = %command, "p4 sync");

        let log_line = |line: &str| info!(project = %self.name, "p4: {}", line);
        ProcessRunner::run_command_lines(&command, Some(&log_line)).await?;
        Ok(())
    }

    async fn clone_workspace(&self) -> SyncResult<ChangedFiles> {
        self.run_sync(true).await?;
        self.write_p4_config().await?;
        Ok(ChangedFiles::new())
    }

    async fn update_workspace(&self) -> SyncResult<ChangedFiles> {
        self.run_sync(false).await?;
        Ok(ChangedFiles::new())
    }

    /// Persist the connection triple so ad-hoc `p4` runs inside the working copy pick it up
    async fn write_p4_config(&self) -> SyncResult<()> {
        let config_dir = self.config_dir();
        match tokio::fs::metadata(&config_dir).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => return Err(SyncError::not_a_directory(&self.name, config_dir)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                create_config_dir(&config_dir)
                    .await
                    .with_filesystem_error("cannot create p4 config directory", Some(config_dir.clone()))?;
            }
            Err(e) => {
                return Err(SyncError::filesystem_error_with_source(
                    "cannot inspect p4 config directory",
                    Some(config_dir),
                    e,
                ))
            }
        }

        let config_path = self.config_path();
        tokio::fs::write(&config_path, self.config_content())
            .await
            .with_filesystem_error("cannot write p4 config", Some(config_path.clone()))?;
        info!(project = %self.name, path = %config_path.display(), "wrote p4 config");
        Ok(())
    }

    fn config_content(&self) -> String {
        format!(
            "P4PORT={}\nP4USER={}\nP4CLIENT={}\n",
            self.port, self.user, self.client
        )
    }
}

async fn create_config_dir(path: &Path) -> std::io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);
    builder.create(path).await
}

#[async_trait]
impl VersionControlProject for P4Project {
    fn name(&self) -> &str {
        &self.name
    }

    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn project_type(&self) -> ProjectType {
        ProjectType::P4
    }

    async fn sync(&mut self) -> SyncResult<ChangedFiles> {
        match inspect_working_copy(&self.name, &self.base_dir).await? {
            WorkingCopyState::Missing => self.clone_workspace().await,
            WorkingCopyState::Directory => self.update_workspace().await,
        }
    }
}
