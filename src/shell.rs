use tracing::{trace, warn};

use crate::UncError;
use crate::platform;

/// Captured output of a command that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs a complete command line and captures its output.
///
/// Implementations block until the process exits. A non-zero exit is reported
/// as [`UncError::ShellCommand`] with the exit code.
pub trait CommandRunner {
    fn run(&self, command: &str) -> Result<CommandOutput, UncError>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, command: &str) -> Result<CommandOutput, UncError> {
        (**self).run(command)
    }
}

/// Runs commands through the system shell: `cmd /C` on Windows, `sh -c`
/// elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> Result<CommandOutput, UncError> {
        let shell_error = |code| UncError::ShellCommand {
            command: command.to_string(),
            code,
        };

        // The command line may carry a password, so only outcomes are logged here.
        let output = platform::shell_command(command).output().map_err(|e| {
            warn!(error = %e, "failed to launch shell");
            shell_error(None)
        })?;

        trace!(status = %output.status, "shell command finished");
        if !output.status.success() {
            return Err(shell_error(output.status.code()));
        }

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
