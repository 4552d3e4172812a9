use crate::domain::{ComposeInvocation, ComposeRuntime};
use crate::error::{ComposerError, Result};
use std::ffi::OsString;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{info, warn};

/// Runs the orchestration tool (`docker-compose`, `docker compose`, ...) as a
/// child process that inherits the terminal.
#[derive(Debug, Clone)]
pub struct ComposeAdapter {
    program: String,
    leading_args: Vec<String>,
}

impl ComposeAdapter {
    pub fn new(program: impl Into<String>, leading_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            leading_args,
        }
    }

    /// Builds an adapter from a full argv such as `["docker", "compose"]`.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, rest) = command.split_first()?;
        Some(Self::new(program.clone(), rest.to_vec()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed after the program name.
    pub fn command_args(&self, invocation: &ComposeInvocation) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.leading_args.iter().map(OsString::from).collect();
        args.extend(invocation.args());
        args
    }

    /// Printable command line, for logs.
    pub fn command_line(&self, invocation: &ComposeInvocation) -> String {
        std::iter::once(self.program.clone())
            .chain(
                self.command_args(invocation)
                    .iter()
                    .map(|arg| arg.to_string_lossy().into_owned()),
            )
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn status(&self, args: Vec<OsString>) -> Result<ExitStatus> {
        Command::new(&self.program)
            .args(args)
            .status()
            .map_err(|source| ComposerError::Invocation {
                program: self.program.clone(),
                source,
            })
    }
}

impl ComposeRuntime for ComposeAdapter {
    fn run(&self, invocation: &ComposeInvocation) -> Result<i32> {
        info!("Running: {}", self.command_line(invocation));

        let status = self.status(self.command_args(invocation))?;
        exit_code(status, &self.program, invocation)
    }

    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .args(&self.leading_args)
            .arg("version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

fn exit_code(status: ExitStatus, program: &str, invocation: &ComposeInvocation) -> Result<i32> {
    match status.code() {
        Some(0) => Ok(0),
        Some(code) => {
            warn!("{program} {} exited with status {code}", invocation.action);
            Ok(code)
        }
        None => {
            warn!("{program} {} was terminated by a signal", invocation.action);
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ComposeAction;
    use std::path::PathBuf;

    fn invocation() -> ComposeInvocation {
        ComposeInvocation::new(
            vec![
                PathBuf::from("compose.yml"),
                PathBuf::from("services/compose.web.yml"),
            ],
            ComposeAction::Up { detach: true },
        )
    }

    #[test]
    fn splits_program_from_leading_args() {
        let adapter =
            ComposeAdapter::from_command(&["docker".to_string(), "compose".to_string()]).unwrap();
        assert_eq!(adapter.program(), "docker");
        assert_eq!(
            adapter.command_line(&invocation()),
            "docker compose -f compose.yml -f services/compose.web.yml up -d"
        );
    }

    #[test]
    fn empty_command_has_no_adapter() {
        assert!(ComposeAdapter::from_command(&[]).is_none());
    }

    #[test]
    fn missing_executable_is_invocation_error() {
        let adapter = ComposeAdapter::new("composer-test-no-such-binary", vec![]);
        let err = adapter.run(&invocation()).unwrap_err();
        assert!(matches!(err, ComposerError::Invocation { .. }));
        assert!(!adapter.is_available());
    }

    #[cfg(unix)]
    #[test]
    fn passes_through_exit_code() {
        let adapter = ComposeAdapter::new("sh", vec!["-c".into(), "exit 3".into()]);
        assert_eq!(adapter.run(&invocation()).unwrap(), 3);

        let adapter = ComposeAdapter::new("true", vec![]);
        assert_eq!(adapter.run(&invocation()).unwrap(), 0);
    }
}
