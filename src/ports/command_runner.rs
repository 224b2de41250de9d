use crate::domain::AppError;

/// Captured result of an external command, kept even on non-zero exit so
/// checks can probe without failing.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Executes local external commands (mkdir, cp, service control).
pub trait CommandRunner {
    /// Run a command and return trimmed stdout; non-zero exit is an error.
    fn run(&self, program: &str, args: &[&str]) -> Result<String, AppError>;

    /// Run a command and capture the outcome without treating non-zero exit
    /// as a failure.
    fn try_run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, AppError>;
}
