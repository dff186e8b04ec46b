use std::future::Future;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, ChildStdout};
use tracing::debug;

use super::command_line::CommandLine;

/// Process runner errors
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Process spawn failed for '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Reading output of '{command}' failed: {source}")]
    ReadFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Waiting for '{command}' failed: {source}")]
    WaitFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Output consumer for '{command}' failed: {source}")]
    StreamFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command '{command}' failed with exit code {exit_code}")]
    CommandFailed { command: String, exit_code: i32 },
}

/// Per-line callback shared by the stdout and stderr readers
///
/// Both readers call it, possibly interleaved, so it must be `Sync`.
pub type LineCallback<'a> = &'a (dyn Fn(&str) + Send + Sync);

/// Runs external commands and streams their output
pub struct ProcessRunner;

impl ProcessRunner {
    /// Run a `KEY=VAL ... program args...` command, delivering each output line to `on_line`
    ///
    /// Lines from stdout and stderr are delivered as they arrive. Order is kept
    /// within a stream, not across streams. Both streams are drained even when
    /// `on_line` is `None`.
    pub async fn run_lines(
        command: &str,
        on_line: Option<LineCallback<'_>>,
    ) -> Result<(), ProcessError> {
        let command = CommandLine::parse(command)?;
        Self::run_command_lines(&command, on_line).await
    }

    /// [`ProcessRunner::run_lines`] over an already assembled command
    pub async fn run_command_lines(
        command: &CommandLine,
        on_line: Option<LineCallback<'_>>,
    ) -> Result<(), ProcessError> {
        let rendered = command.to_string();
        debug!(command = %rendered, "running command");

        let mut child = command
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: rendered.clone(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let (stdout_result, stderr_result) =
            tokio::join!(drain_lines(stdout, on_line), drain_lines(stderr, on_line));

        let exit_code = wait_for_exit(&mut child, &rendered).await?;

        stdout_result
            .and(stderr_result)
            .map_err(|source| ProcessError::ReadFailed {
                command: rendered.clone(),
                source,
            })?;

        check_exit_code(rendered, exit_code)
    }

    /// Run a command and hand its raw stdout to `on_stream`
    ///
    /// Stderr is discarded. Returns what `on_stream` produced once the process
    /// has exited. Output `on_stream` leaves unread is dropped with the pipe.
    pub async fn run_bytes<F, Fut, T>(command: &str, on_stream: F) -> Result<T, ProcessError>
    where
        F: FnOnce(ChildStdout) -> Fut,
        Fut: Future<Output = std::io::Result<T>>,
    {
        let command = CommandLine::parse(command)?;
        Self::run_command_bytes(&command, on_stream).await
    }

    /// [`ProcessRunner::run_bytes`] over an already assembled command
    pub async fn run_command_bytes<F, Fut, T>(
        command: &CommandLine,
        on_stream: F,
    ) -> Result<T, ProcessError>
    where
        F: FnOnce(ChildStdout) -> Fut,
        Fut: Future<Output = std::io::Result<T>>,
    {
        let rendered = command.to_string();
        debug!(command = %rendered, "running command");

        let mut child = command
            .to_command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: rendered.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or_else(|| ProcessError::SpawnFailed {
            command: rendered.clone(),
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout was not captured"),
        })?;

        let consumed = on_stream(stdout).await;
        let exit_code = wait_for_exit(&mut child, &rendered).await?;

        let value = consumed.map_err(|source| ProcessError::StreamFailed {
            command: rendered.clone(),
            source,
        })?;
        check_exit_code(rendered, exit_code)?;
        Ok(value)
    }
}

/// Read `stream` line by line until EOF.
///
/// Returning early drops the reader, which closes the pipe so the child
/// cannot block on a full buffer.
async fn drain_lines<R>(stream: Option<R>, on_line: Option<LineCallback<'_>>) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(stream) = stream else {
        return Ok(());
    };

    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }
        if let Some(on_line) = on_line {
            let line = String::from_utf8_lossy(trim_line_ending(&buf));
            on_line(&line);
        }
    }
}

fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

async fn wait_for_exit(child: &mut Child, command: &str) -> Result<i32, ProcessError> {
    let status = child.wait().await.map_err(|source| ProcessError::WaitFailed {
        command: command.to_string(),
        source,
    })?;
    // killed by a signal
    Ok(status.code().unwrap_or(-1))
}

fn check_exit_code(command: String, exit_code: i32) -> Result<(), ProcessError> {
    if exit_code == 0 {
        Ok(())
    } else {
        Err(ProcessError::CommandFailed { command, exit_code })
    }
}
