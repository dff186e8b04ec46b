use std::fmt;
use tokio::process::Command as TokioCommand;

use super::ProcessError;

/// A command split into its environment overlay, program and arguments
///
/// The textual form is `KEY=VAL KEY2=VAL2 program arg1 arg2`. Tokens are
/// separated by whitespace with no quoting support; every leading token that
/// contains `=` is an environment assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    env: Vec<(String, String)>,
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Start a command for `program` with no arguments and no overlay
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            env: Vec::new(),
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Parse the `KEY=VAL ... program args...` shape
    pub fn parse(command: &str) -> Result<Self, ProcessError> {
        let mut tokens = command.split_whitespace().peekable();
        if tokens.peek().is_none() {
            return Err(ProcessError::InvalidCommand("Command is empty".to_string()));
        }

        let mut env = Vec::new();
        while let Some(token) = tokens.next_if(|token| token.contains('=')) {
            // contains('=') guarantees the split succeeds
            if let Some((key, value)) = token.split_once('=') {
                env.push((key.to_string(), value.to_string()));
            }
        }

        let program = tokens.next().ok_or_else(|| {
            ProcessError::InvalidCommand(format!("No executable in '{}'", command.trim()))
        })?;

        Ok(Self {
            env,
            program: program.to_string(),
            args: tokens.map(str::to_string).collect(),
        })
    }

    /// Add an environment assignment
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env_overlay(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    /// Build the tokio command; the overlay is merged onto the inherited environment.
    pub(crate) fn to_command(&self) -> TokioCommand {
        let mut cmd = TokioCommand::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{}={} ", key, value)?;
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_env_overlay() {
        let command = CommandLine::parse("A=1 B=2 echo hello").unwrap();

        assert_eq!(
            command.env_overlay(),
            &[
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "2".to_string())
            ]
        );
        assert_eq!(command.program(), "echo");
        assert_eq!(command.arguments(), &["hello".to_string()]);
    }

    #[test]
    fn test_parse_without_overlay() {
        let command = CommandLine::parse("  git status   --porcelain ").unwrap();
        assert!(command.env_overlay().is_empty());
        assert_eq!(command.program(), "git");
        assert_eq!(command.arguments(), &["status", "--porcelain"]);
    }

    #[test]
    fn test_parse_keeps_equals_after_program() {
        let command = CommandLine::parse("X=a=b tool --flag=value").unwrap();
        assert_eq!(
            command.env_overlay(),
            &[("X".to_string(), "a=b".to_string())]
        );
        assert_eq!(command.arguments(), &["--flag=value"]);
    }

    #[test]
    fn test_parse_rejects_empty_command() {
        assert!(matches!(
            CommandLine::parse("   "),
            Err(ProcessError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_parse_rejects_assignments_only() {
        assert!(matches!(
            CommandLine::parse("A=1 B=2"),
            Err(ProcessError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_builder_display_matches_text_form() {
        let command = CommandLine::new("p4")
            .env("P4PORT", "ssl:p4:1666")
            .env("P4USER", "build")
            .args(["sync", "-f"]);

        assert_eq!(command.to_string(), "P4PORT=ssl:p4:1666 P4USER=build p4 sync -f");
        assert_eq!(CommandLine::parse(&command.to_string()).unwrap(), command);
    }
}
