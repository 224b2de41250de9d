mod console_prompt;
mod process_runner;
mod ssh_shell;

pub use console_prompt::ConsolePrompt;
pub use process_runner::ProcessRunner;
pub use ssh_shell::SshShell;
