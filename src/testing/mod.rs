//! Shared test doubles for the ports.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::path::Path;

use crate::domain::{AppError, PromptReply};
use crate::ports::{CommandOutput, CommandRunner, PromptIo, RemoteShell};

/// Prompt console fed from a fixed script of raw replies.
pub struct ScriptedPrompt {
    replies: VecDeque<String>,
    asked: Vec<String>,
    said: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
            said: Vec::new(),
        }
    }

    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    pub fn said(&self) -> &[String] {
        &self.said
    }
}

impl PromptIo for ScriptedPrompt {
    fn ask(&mut self, prompt: &str, _current: Option<&str>) -> Result<PromptReply, AppError> {
        self.asked.push(prompt.to_string());
        match self.replies.pop_front() {
            Some(raw) => Ok(PromptReply::from_raw(&raw)),
            None => Err(AppError::PromptIo("script exhausted".to_string())),
        }
    }

    fn say(&mut self, text: &str) {
        self.said.push(text.to_string());
    }
}

/// Command runner that records invocations and answers from a canned table.
/// Unknown commands succeed with empty output.
#[derive(Default)]
pub struct MockRunner {
    canned: HashMap<String, CommandOutput>,
    invocations: RefCell<Vec<String>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer any command whose rendered form contains `needle`.
    pub fn respond(mut self, needle: &str, status: i32, stdout: &str) -> Self {
        self.canned.insert(
            needle.to_string(),
            CommandOutput { status, stdout: stdout.to_string(), stderr: String::new() },
        );
        self
    }

    pub fn invocations(&self) -> Vec<String> {
        self.invocations.borrow().clone()
    }

    fn record(&self, program: &str, args: &[&str]) -> String {
        let rendered = format!("{} {}", program, args.join(" "));
        self.invocations.borrow_mut().push(rendered.clone());
        rendered
    }

    fn lookup(&self, rendered: &str) -> CommandOutput {
        for (needle, output) in &self.canned {
            if rendered.contains(needle.as_str()) {
                return output.clone();
            }
        }
        CommandOutput { status: 0, stdout: String::new(), stderr: String::new() }
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, AppError> {
        let rendered = self.record(program, args);
        let output = self.lookup(&rendered);
        if output.status != 0 {
            return Err(AppError::CommandFailed { command: rendered, details: output.stderr });
        }
        Ok(output.stdout)
    }

    fn try_run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, AppError> {
        let rendered = self.record(program, args);
        Ok(self.lookup(&rendered))
    }
}

/// Remote shell double with per-host canned replies and a recorded call log.
#[derive(Default)]
pub struct MockRemote {
    canned: HashMap<String, String>,
    failing_hosts: Vec<String>,
    calls: RefCell<Vec<String>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands containing `needle` on `host` with `stdout`.
    pub fn respond(mut self, host: &str, needle: &str, stdout: &str) -> Self {
        self.canned.insert(format!("{}::{}", host, needle), stdout.to_string());
        self
    }

    /// All calls against `host` fail.
    pub fn fail_host(mut self, host: &str) -> Self {
        self.failing_hosts.push(host.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn answer(&self, host: &str, command: &str) -> Option<String> {
        self.canned.iter().find_map(|(key, stdout)| {
            let (canned_host, needle) = key.split_once("::")?;
            (canned_host == host && command.contains(needle)).then(|| stdout.clone())
        })
    }
}

impl RemoteShell for MockRemote {
    fn ssh(&self, user: &str, host: &str, command: &str) -> Result<String, AppError> {
        self.calls.borrow_mut().push(format!("{}@{}: {}", user, host, command));
        if self.failing_hosts.iter().any(|h| h == host) {
            return Err(AppError::SshFailed {
                host: host.to_string(),
                details: "mock ssh failure".to_string(),
            });
        }
        Ok(self.answer(host, command).unwrap_or_default())
    }

    fn try_ssh(&self, user: &str, host: &str, command: &str) -> Result<CommandOutput, AppError> {
        match self.ssh(user, host, command) {
            Ok(stdout) => Ok(CommandOutput { status: 0, stdout, stderr: String::new() }),
            Err(_) => Ok(CommandOutput {
                status: 255,
                stdout: String::new(),
                stderr: "mock ssh failure".to_string(),
            }),
        }
    }

    fn push_file(
        &self,
        user: &str,
        host: &str,
        local: &Path,
        remote: &str,
    ) -> Result<(), AppError> {
        self.calls
            .borrow_mut()
            .push(format!("{}@{}: push {} -> {}", user, host, local.display(), remote));
        if self.failing_hosts.iter().any(|h| h == host) {
            return Err(AppError::SshFailed {
                host: host.to_string(),
                details: "mock scp failure".to_string(),
            });
        }
        Ok(())
    }
}
