use anyhow::{anyhow, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::application::use_cases::sync_projects::{
    SyncProjectsConfig, SyncProjectsUseCase, SyncReport,
};
use crate::infrastructure::vcs::BackendConfig;

/// Handler for the sync command
pub struct SyncCommand {
    pub manifest: PathBuf,
    pub projects: Vec<String>,
    pub jobs: Option<usize>,
    pub interval: Option<u64>,
    pub backend: BackendConfig,
    pub verbose: bool,
}

impl SyncCommand {
    pub fn new(
        manifest: PathBuf,
        projects: Vec<String>,
        jobs: Option<usize>,
        interval: Option<u64>,
        backend: BackendConfig,
        verbose: bool,
    ) -> Self {
        Self {
            manifest,
            projects,
            jobs,
            interval,
            backend,
            verbose,
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let mut config = SyncProjectsConfig::new(&self.manifest, self.backend.clone())
            .with_projects(self.projects.clone());
        if let Some(jobs) = self.jobs {
            config = config.with_parallel_jobs(jobs);
        }

        let mut use_case = SyncProjectsUseCase::prepare(&config)
            .await
            .map_err(|e| anyhow!("Failed to prepare projects: {}", e))?;

        match self.interval {
            Some(secs) => {
                println!(
                    "{} Syncing {} project(s) every {}s, press Ctrl-C to stop",
                    "::".blue().bold(),
                    use_case.projects().len(),
                    secs
                );
                let rounds = use_case
                    .run_polling(Duration::from_secs(secs), shutdown_signal(), |report| {
                        self.print_report(report)
                    })
                    .await;
                println!("{} Stopped after {} round(s)", "✓".green().bold(), rounds);
                Ok(())
            }
            None => {
                println!(
                    "{} Syncing {} project(s)...",
                    "::".blue().bold(),
                    use_case.projects().len()
                );
                let report = use_case.sync_once().await;
                self.print_report(&report);

                if report.is_success() {
                    Ok(())
                } else {
                    Err(anyhow!(
                        "{} of {} project(s) failed to sync",
                        report.failed.len(),
                        report.total_count()
                    ))
                }
            }
        }
    }

    fn print_report(&self, report: &SyncReport) {
        if report.is_success() {
            println!(
                "{} Synchronization completed! ({} project(s))",
                "✓".green().bold(),
                report.synced.len()
            );
        } else {
            println!("{} Some projects failed:", "⚠".yellow().bold());
            for (name, error) in &report.failed {
                println!("  {}: {}", name.bold(), error.to_string().red());
            }
        }

        if self.verbose {
            for name in &report.synced {
                println!("  {} {}", "->".blue(), name);
            }
            println!("  Elapsed: {} ms", report.elapsed_ms);
        }
    }
}

/// Resolves on Ctrl-C
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl-C, stopping after this round");
    }
}
