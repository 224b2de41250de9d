use std::path::Path;

use crate::domain::AppError;
use crate::ports::CommandOutput;

/// Runs commands and pushes files on a remote host over SSH. The SSH client
/// and server are external collaborators; this port only shapes the calls.
pub trait RemoteShell {
    /// Run a shell command remotely and return trimmed stdout; non-zero exit
    /// is an error.
    fn ssh(&self, user: &str, host: &str, command: &str) -> Result<String, AppError>;

    /// Run a shell command remotely, capturing the outcome without treating
    /// non-zero exit as a failure.
    fn try_ssh(&self, user: &str, host: &str, command: &str) -> Result<CommandOutput, AppError>;

    /// Copy a local file to a path on the remote host.
    fn push_file(
        &self,
        user: &str,
        host: &str,
        local: &Path,
        remote: &str,
    ) -> Result<(), AppError>;
}
