//! Common test utilities and helpers
//!
//! Fake `git` and `p4` binaries are small shell scripts that append their
//! arguments to a log file, so tests can assert on the exact commands a
//! project ran without touching a real server.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::TempDir;

static SCRIPT_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that write and execute scripts
///
/// Executing a script while another thread still holds it open for
/// writing fails with ETXTBSY.
pub fn script_lock() -> MutexGuard<'static, ()> {
    SCRIPT_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

const GIT_SCRIPT: &str = r#"#!/bin/sh
echo "$*" >> "@LOG@"
if [ "$1" = "-C" ]; then
    shift 2
fi
@FAIL@
case "$1" in
    clone)
        eval last=\${$#}
        mkdir -p "$last"
        echo "Cloning into '$last'..." >&2
        ;;
    branch)
        echo "  feature"
        echo "* main"
        ;;
    fetch)
        echo "Fetching origin"
        ;;
    reset)
        echo "HEAD is now at 1a2b3c4 Latest commit"
        ;;
esac
exit 0
"#;

const P4_SCRIPT: &str = r#"#!/bin/sh
echo "P4PORT=$P4PORT P4USER=$P4USER P4CLIENT=$P4CLIENT $*" >> "@LOG@"
@FAIL@
@EXTRA@
echo "//depot/main/README#3 - updating README"
exit 0
"#;

/// A fake backend binary plus the log of its invocations
pub struct FakeBackend {
    dir: TempDir,
    binary: PathBuf,
    log: PathBuf,
}

impl FakeBackend {
    /// Fake git handling `clone`, `branch`, `fetch` and `reset`
    pub fn git() -> Self {
        Self::build("git", GIT_SCRIPT, None, "")
    }

    /// Fake git whose `subcommand` exits with status 3
    pub fn git_failing(subcommand: &str) -> Self {
        Self::build("git", GIT_SCRIPT, Some(subcommand), "")
    }

    /// Fake p4 that only logs `sync`
    pub fn p4() -> Self {
        Self::build("p4", P4_SCRIPT, None, "")
    }

    /// Fake p4 whose every run exits with status 3
    pub fn p4_failing() -> Self {
        Self::build("p4", P4_SCRIPT, Some("sync"), "")
    }

    /// Fake p4 that also runs `snippet` before succeeding
    pub fn p4_with(snippet: &str) -> Self {
        Self::build("p4", P4_SCRIPT, None, snippet)
    }

    fn build(name: &str, template: &str, fail_on: Option<&str>, extra: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let binary = dir.path().join(name);
        let log = dir.path().join("calls.log");

        let fail = match fail_on {
            Some(subcommand) => format!(
                "if [ \"$1\" = \"{}\" ]; then echo \"fatal: {} failed\" >&2; exit 3; fi",
                subcommand, subcommand
            ),
            None => String::new(),
        };
        let script = template
            .replace("@LOG@", &log.to_string_lossy())
            .replace("@FAIL@", &fail)
            .replace("@EXTRA@", extra);
        write_executable(&binary, &script);

        Self { dir, binary, log }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Logged invocations, one per line, in call order
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log)
            .map(|content| content.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

fn write_executable(path: &Path, content: &str) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, content).expect("Failed to write script");
    let mut permissions = std::fs::metadata(path)
        .expect("Failed to stat script")
        .permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(path, permissions).expect("Failed to chmod script");
}

/// Write a manifest listing `body` (already indented YAML entries)
pub fn write_manifest(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("projects.yml");
    std::fs::write(&path, format!("projects:\n{}", body)).expect("Failed to write manifest");
    path
}
