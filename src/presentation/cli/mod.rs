pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use std::process::exit;

use crate::domain::value_objects::project_type::ProjectType;
use crate::infrastructure::vcs::BackendConfig;
use commands::{ProbeCommand, SyncCommand};

/// Output format options for the probe command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
}

/// vcsync - Keep Perforce and Git working copies in sync
#[derive(Parser)]
#[command(name = "vcsync")]
#[command(about = "Keep Perforce and Git working copies in sync")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path of the p4 binary
    #[arg(long, global = true, env = "VCSYNC_P4_BIN")]
    pub p4_bin: Option<PathBuf>,

    /// Path of the git binary
    #[arg(long, global = true, env = "VCSYNC_GIT_BIN")]
    pub git_bin: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Backend binaries from the flags (or their environment fallbacks)
    pub fn backend_config(&self) -> BackendConfig {
        let mut backend = BackendConfig::default();
        if let Some(path) = self.p4_bin.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            backend = backend.with_binary(ProjectType::P4, path);
        }
        if let Some(path) = self.git_bin.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            backend = backend.with_binary(ProjectType::Git, path);
        }
        backend
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synchronize the projects listed in a manifest
    Sync {
        /// Path to the project manifest
        manifest: PathBuf,

        /// Projects to sync (if not specified, all projects will be synced)
        #[arg(short, long)]
        project: Vec<String>,

        /// Number of parallel jobs
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Keep syncing every SECS seconds until interrupted
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },

    /// Show hash, length and binary flag of files
    Probe {
        /// Files or directories to inspect
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format (text, json)
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    pub fn verbose(&self) -> bool {
        self.cli.verbose
    }

    pub async fn run(self) -> anyhow::Result<()> {
        colored::control::set_override(!self.cli.no_color);

        match self.handle_command().await {
            Ok(_) => Ok(()),
            Err(e) => {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
                exit(1);
            }
        }
    }

    async fn handle_command(&self) -> anyhow::Result<()> {
        match &self.cli.command {
            Commands::Sync {
                manifest,
                project,
                jobs,
                interval,
            } => {
                let command = SyncCommand::new(
                    manifest.clone(),
                    project.clone(),
                    *jobs,
                    *interval,
                    self.cli.backend_config(),
                    self.cli.verbose,
                );
                command.execute().await
            }
            Commands::Probe { paths, output } => {
                ProbeCommand::new(paths.clone(), *output).execute().await
            }
        }
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sync_command() {
        let cli = Cli::try_parse_from([
            "vcsync",
            "sync",
            "projects.yml",
            "-p",
            "core",
            "-p",
            "depot",
            "-j",
            "4",
            "--git-bin",
            "/usr/bin/git",
        ])
        .unwrap();

        match &cli.command {
            Commands::Sync {
                manifest,
                project,
                jobs,
                interval,
            } => {
                assert_eq!(manifest, &PathBuf::from("projects.yml"));
                assert_eq!(project, &vec!["core".to_string(), "depot".to_string()]);
                assert_eq!(*jobs, Some(4));
                assert_eq!(*interval, None);
            }
            _ => panic!("Expected sync command"),
        }
        assert!(cli.backend_config().is_configured(ProjectType::Git));
    }

    #[test]
    fn test_parse_probe_command() {
        let cli = Cli::try_parse_from(["vcsync", "probe", "a.bin", "b.txt", "--output", "json"])
            .unwrap();
        match cli.command {
            Commands::Probe { paths, output } => {
                assert_eq!(paths.len(), 2);
                assert_eq!(output, OutputFormat::Json);
            }
            _ => panic!("Expected probe command"),
        }
    }

    #[test]
    fn test_probe_requires_paths() {
        assert!(Cli::try_parse_from(["vcsync", "probe"]).is_err());
    }
}
