use std::path::Path;

use crate::domain::AppError;
use crate::ports::{CommandOutput, CommandRunner, RemoteShell};

/// Shells out to the system `ssh`/`scp` clients. Key authentication only;
/// host key prompts are suppressed so batch runs cannot hang.
#[derive(Debug, Clone)]
pub struct SshShell<R: CommandRunner> {
    runner: R,
}

const SSH_OPTIONS: [&str; 6] = [
    "-o",
    "PreferredAuthentications=publickey",
    "-o",
    "IdentitiesOnly=yes",
    "-o",
    "StrictHostKeyChecking=no",
];

impl<R: CommandRunner> SshShell<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn ssh_args<'a>(&self, target: &'a str, command: &'a str) -> Vec<&'a str> {
        let mut args: Vec<&str> = SSH_OPTIONS.to_vec();
        args.push(target);
        args.push(command);
        args
    }
}

impl<R: CommandRunner> RemoteShell for SshShell<R> {
    fn ssh(&self, user: &str, host: &str, command: &str) -> Result<String, AppError> {
        let target = format!("{}@{}", user, host);
        let wrapped = format!(". /etc/profile; {}", command);
        self.runner
            .run("ssh", &self.ssh_args(&target, &wrapped))
            .map_err(|e| AppError::SshFailed { host: host.to_string(), details: e.to_string() })
    }

    fn try_ssh(&self, user: &str, host: &str, command: &str) -> Result<CommandOutput, AppError> {
        let target = format!("{}@{}", user, host);
        let wrapped = format!(". /etc/profile; {}", command);
        self.runner
            .try_run("ssh", &self.ssh_args(&target, &wrapped))
            .map_err(|e| AppError::SshFailed { host: host.to_string(), details: e.to_string() })
    }

    fn push_file(
        &self,
        user: &str,
        host: &str,
        local: &Path,
        remote: &str,
    ) -> Result<(), AppError> {
        let local_path = local.display().to_string();
        let target = format!("{}@{}:{}", user, host, remote);
        let mut args: Vec<&str> = SSH_OPTIONS.to_vec();
        args.push(&local_path);
        args.push(&target);
        self.runner
            .run("scp", &args)
            .map(|_| ())
            .map_err(|e| AppError::SshFailed { host: host.to_string(), details: e.to_string() })
    }
}
