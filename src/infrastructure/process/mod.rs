//! Subprocess execution with streamed output
pub mod command_line;
pub mod process_runner;

pub use command_line::CommandLine;
pub use process_runner::{LineCallback, ProcessError, ProcessRunner};
