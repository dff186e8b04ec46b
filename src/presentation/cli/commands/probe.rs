use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::infrastructure::filesystem::FileProbe;
use crate::presentation::cli::OutputFormat;

/// Handler for the probe command
pub struct ProbeCommand {
    pub paths: Vec<PathBuf>,
    pub output: OutputFormat,
}

/// What was found at one probed path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProbeEntry {
    File {
        path: PathBuf,
        length: u64,
        sha512: String,
        binary: bool,
    },
    Directory {
        path: PathBuf,
        empty: bool,
    },
}

impl ProbeCommand {
    pub fn new(paths: Vec<PathBuf>, output: OutputFormat) -> Self {
        Self { paths, output }
    }

    pub async fn execute(&self) -> Result<()> {
        let mut entries = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            entries.push(probe_path(path).await?);
        }

        match self.output {
            OutputFormat::Text => print_text(&entries),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        }
        Ok(())
    }
}

/// Inspect a single file or directory
pub async fn probe_path(path: &Path) -> Result<ProbeEntry> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Cannot access {}", path.display()))?;

    if metadata.is_dir() {
        return Ok(ProbeEntry::Directory {
            path: path.to_path_buf(),
            empty: FileProbe::is_empty_directory(path).await,
        });
    }

    let length = FileProbe::length(path)
        .await
        .with_context(|| format!("Cannot measure {}", path.display()))?;
    let sha512 = FileProbe::hash(path)
        .await
        .with_context(|| format!("Cannot hash {}", path.display()))?;

    Ok(ProbeEntry::File {
        path: path.to_path_buf(),
        length,
        sha512,
        binary: FileProbe::is_binary(path).await,
    })
}

fn print_text(entries: &[ProbeEntry]) {
    for entry in entries {
        match entry {
            ProbeEntry::File {
                path,
                length,
                sha512,
                binary,
            } => {
                let kind = if *binary { "binary".yellow() } else { "text".green() };
                println!("{}", path.display().to_string().bold());
                println!("  length: {}", length);
                println!("  type:   {}", kind);
                println!("  sha512: {}", sha512);
            }
            ProbeEntry::Directory { path, empty } => {
                let state = if *empty { "empty".dimmed() } else { "not empty".normal() };
                println!("{}/ ({})", path.display().to_string().bold(), state);
            }
        }
    }
}
