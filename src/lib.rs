//! # vcsync - Version Control Working Copy Synchronizer
//!
//! `vcsync` keeps local working copies of Perforce and Git projects in sync
//! with their servers by driving the backends' own command-line tools.
//!
//! ## Features
//!
//! - **Two Backends**: Perforce (`p4 sync`) and Git (`clone`, `fetch`, `reset --hard`)
//! - **Clone or Update**: A missing working copy is cloned, an existing one is updated
//! - **Streaming Subprocesses**: Output is consumed line by line or as a byte stream
//! - **File Probing**: Binary detection, SHA-512 hashing and lengths of files on disk
//! - **Manifest-based Configuration**: Projects are listed in a YAML manifest
//!
//! ## Quick Start
//!
//! 1. Create a manifest file (`projects.yml`):
//!
//! ```yaml
//! projects:
//!   - name: depot
//!     type: p4
//!     base_dir: /srv/src/depot
//!     options:
//!       P4PORT: ssl:perforce:1666
//!       P4USER: build
//!       P4CLIENT: build-depot
//!   - name: core
//!     type: git
//!     base_dir: /srv/src/core
//!     options:
//!       Url: https://example.com/core.git
//!       Branch: main
//! ```
//!
//! 2. Point the tool at the backend binaries and sync:
//!
//! ```bash
//! export VCSYNC_P4_BIN=/usr/local/bin/p4
//! export VCSYNC_GIT_BIN=/usr/bin/git
//! vcsync sync projects.yml
//! ```
//!
//! ## Architecture
//!
//! - [`domain`]: Manifest entities and the project type
//! - [`application`]: The sync workflow
//! - [`infrastructure`]: Subprocesses, file probing and the version control backends
//! - [`presentation`]: CLI interface
//! - [`common`]: Error handling
//!
//! ## Examples
//!
//! ```rust,no_run
//! use vcsync::application::use_cases::sync_projects::{SyncProjectsConfig, SyncProjectsUseCase};
//! use vcsync::infrastructure::vcs::BackendConfig;
//!
//! # async fn example() -> vcsync::Result<()> {
//! let config = SyncProjectsConfig::new("projects.yml", BackendConfig::from_env())
//!     .with_projects(vec!["core".to_string()]);
//!
//! let mut use_case = SyncProjectsUseCase::prepare(&config).await?;
//! let report = use_case.sync_once().await;
//!
//! println!("Synced {} of {} projects", report.synced.len(), report.total_count());
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::SyncError;
pub use crate::common::result::SyncResult as Result;
