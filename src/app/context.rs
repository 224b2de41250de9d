use crate::app::output::Output;
use crate::ports::{CommandRunner, PromptIo, RemoteShell};

/// Everything a command needs to touch the outside world: the local process
/// runner, the SSH fan-out, the interactive console and the leveled output.
/// Commands receive it whole so tests can substitute any collaborator.
pub struct AppContext<R, S, P> {
    pub runner: R,
    pub remote: S,
    pub io: P,
    pub out: Output,
    pub local_hostname: String,
}

impl<R, S, P> AppContext<R, S, P>
where
    R: CommandRunner,
    S: RemoteShell,
    P: PromptIo,
{
    pub fn new(runner: R, remote: S, io: P, out: Output, local_hostname: String) -> Self {
        Self { runner, remote, io, out, local_hostname }
    }
}
