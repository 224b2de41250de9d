use std::process::Command;

use crate::domain::AppError;
use crate::ports::{CommandOutput, CommandRunner};

/// Runs local commands through `std::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn capture(&self, program: &str, args: &[&str]) -> Result<CommandOutput, AppError> {
        let output = Command::new(program).args(args).output().map_err(|e| {
            AppError::CommandFailed {
                command: format!("{} {}", program, args.join(" ")),
                details: e.to_string(),
            }
        })?;

        Ok(CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, AppError> {
        let output = self.capture(program, args)?;
        if !output.success() {
            let details =
                if output.stderr.is_empty() { "Unknown error".to_string() } else { output.stderr };
            return Err(AppError::CommandFailed {
                command: format!("{} {}", program, args.join(" ")),
                details,
            });
        }
        Ok(output.stdout)
    }

    fn try_run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, AppError> {
        self.capture(program, args)
    }
}
