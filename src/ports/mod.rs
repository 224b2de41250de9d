mod command_runner;
mod prompt_io;
mod remote_shell;

pub use command_runner::{CommandOutput, CommandRunner};
pub use prompt_io::PromptIo;
pub use remote_shell::RemoteShell;
