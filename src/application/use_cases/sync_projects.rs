use futures::future::join_all;
use std::future::Future;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::common::error::SyncError;
use crate::common::result::SyncResult;
use crate::infrastructure::filesystem::manifest_store::ManifestStore;
use crate::infrastructure::vcs::{BackendConfig, ProjectFactory, VersionControlProject};

/// Settings for syncing the projects listed in a manifest
#[derive(Debug, Clone)]
pub struct SyncProjectsConfig {
    /// Manifest listing the projects
    pub manifest_path: PathBuf,

    /// Names of the projects to sync (all when empty)
    pub projects: Vec<String>,

    /// Maximum concurrent syncs (CPU count when `None`)
    pub parallel_jobs: Option<usize>,

    /// Backend binary locations
    pub backend: BackendConfig,
}

impl SyncProjectsConfig {
    pub fn new(manifest_path: impl Into<PathBuf>, backend: BackendConfig) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            projects: Vec::new(),
            parallel_jobs: None,
            backend,
        }
    }

    pub fn with_projects(mut self, projects: Vec<String>) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_parallel_jobs(mut self, parallel_jobs: usize) -> Self {
        self.parallel_jobs = Some(parallel_jobs);
        self
    }

    fn max_concurrency(&self) -> usize {
        self.parallel_jobs.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// Outcome of one sync round
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Projects that synced and compiled cleanly
    pub synced: Vec<String>,

    /// Projects that failed, with the reason
    pub failed: Vec<(String, SyncError)>,

    /// Wall-clock time of the round in milliseconds
    pub elapsed_ms: u64,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.synced.len() + self.failed.len()
    }
}

/// Keeps a fixed set of projects in sync
///
/// Projects are built once and reused for every round, so lazily detected
/// state (such as a Git branch) carries over between rounds.
pub struct SyncProjectsUseCase {
    projects: Vec<Box<dyn VersionControlProject>>,
    max_concurrency: usize,
}

impl SyncProjectsUseCase {
    /// Load the manifest and build every selected project
    ///
    /// Any misconfigured project aborts preparation.
    pub async fn prepare(config: &SyncProjectsConfig) -> SyncResult<Self> {
        let manifest = ManifestStore::load(&config.manifest_path).await?;
        let entries = manifest
            .select(&config.projects)
            .map_err(|message| SyncError::validation_error("projects", message))?;

        let projects = entries
            .into_iter()
            .map(|entry| ProjectFactory::from_entry(entry, &config.backend))
            .collect::<SyncResult<Vec<_>>>()?;

        info!(
            manifest = %config.manifest_path.display(),
            projects = projects.len(),
            "prepared projects"
        );
        Ok(Self::from_projects(projects, config.max_concurrency()))
    }

    /// Use already constructed projects
    pub fn from_projects(projects: Vec<Box<dyn VersionControlProject>>, max_concurrency: usize) -> Self {
        Self {
            projects,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn projects(&self) -> &[Box<dyn VersionControlProject>] {
        &self.projects
    }

    /// Sync and compile every project once
    pub async fn sync_once(&mut self) -> SyncReport {
        let start_time = Instant::now();
        let semaphore = Semaphore::new(self.max_concurrency);

        let tasks = self.projects.iter_mut().map(|project| {
            let semaphore = &semaphore;
            async move {
                let _permit = semaphore.acquire().await.ok();
                let result = sync_project(project.as_mut()).await;
                (project.name().to_string(), result)
            }
        });
        let results = join_all(tasks).await;

        let mut report = SyncReport::default();
        for (name, result) in results {
            match result {
                Ok(()) => report.synced.push(name),
                Err(e) => {
                    error!(project = %name, error = %e, "sync failed");
                    report.failed.push((name, e));
                }
            }
        }
        report.elapsed_ms = start_time.elapsed().as_millis() as u64;
        info!(
            synced = report.synced.len(),
            failed = report.failed.len(),
            elapsed_ms = report.elapsed_ms,
            "sync round finished"
        );
        report
    }

    /// Sync every `interval` until `shutdown` resolves; returns the number of rounds
    ///
    /// A round in progress always runs to completion; `shutdown` is only
    /// observed while waiting for the next round.
    pub async fn run_polling<S, F>(&mut self, interval: Duration, shutdown: S, mut on_round: F) -> usize
    where
        S: Future<Output = ()>,
        F: FnMut(&SyncReport),
    {
        tokio::pin!(shutdown);
        let mut rounds = 0;
        loop {
            let report = self.sync_once().await;
            rounds += 1;
            on_round(&report);

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
        info!(rounds, "polling stopped");
        rounds
    }
}

async fn sync_project(project: &mut dyn VersionControlProject) -> SyncResult<()> {
    info!(project = %project.name(), project_type = %project.project_type(), "syncing");
    let changed = project.sync().await?;
    project.compile().await?;
    info!(project = %project.name(), changed = changed.len(), "synced");
    Ok(())
}
