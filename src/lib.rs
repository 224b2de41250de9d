//! clusterkit: configure and deploy database replication clusters.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

use adapters::{ConsolePrompt, ProcessRunner, SshShell};
use app::AppContext;
use app::commands::{install, service, validate};
use app::output::Output;
use ports::CommandRunner;

pub use app::commands::install::InstallOptions;
pub use app::commands::service::ServiceOptions;
pub use app::commands::validate::ValidateOptions;
pub use domain::AppError;

fn context(
    verbose: bool,
    quiet: bool,
) -> AppContext<ProcessRunner, SshShell<ProcessRunner>, ConsolePrompt> {
    let runner = ProcessRunner::new();
    let local_hostname = runner
        .run("hostname", &[])
        .unwrap_or_else(|_| "localhost".to_string());
    AppContext::new(
        ProcessRunner::new(),
        SshShell::new(runner),
        ConsolePrompt::new(),
        Output::new(verbose, quiet),
        local_hostname,
    )
}

/// Collect a cluster configuration and deploy it to every target host.
pub fn install(options: &InstallOptions, verbose: bool, quiet: bool) -> Result<(), AppError> {
    let mut ctx = context(verbose, quiet);
    install::execute(&mut ctx, options)
}

/// Create, update or delete one replication service.
pub fn service(options: &ServiceOptions, verbose: bool, quiet: bool) -> Result<(), AppError> {
    let mut ctx = context(verbose, quiet);
    service::execute(&mut ctx, options)
}

/// Validate a saved configuration and its target hosts.
pub fn validate(options: &ValidateOptions, verbose: bool, quiet: bool) -> Result<(), AppError> {
    let mut ctx = context(verbose, quiet);
    validate::execute(&mut ctx, options)
}
