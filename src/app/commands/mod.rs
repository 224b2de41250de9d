pub mod install;
pub mod service;
pub mod validate;

use crate::app::AppContext;
use crate::app::checks::{CheckContext, run_checks, standard_checks};
use crate::app::deploy::{expand_host_config, target_hosts};
use crate::app::output::Output;
use crate::domain::{AppError, PropertyStore, ValidationReport};
use crate::ports::{CommandRunner, PromptIo, RemoteShell};

/// Run the pre-flight check suite against every target host, merging the
/// per-host findings into one report.
pub(crate) fn preflight<R, S, P>(
    ctx: &AppContext<R, S, P>,
    store: &PropertyStore,
) -> ValidationReport
where
    R: CommandRunner,
    S: RemoteShell,
    P: PromptIo,
{
    let checks = standard_checks();
    let mut merged = ValidationReport::new();
    for alias in target_hosts(store) {
        let expanded = expand_host_config(store, &alias);
        let check_ctx = CheckContext {
            config: &expanded,
            runner: &ctx.runner,
            remote: &ctx.remote,
            out: &ctx.out,
            local_hostname: ctx.local_hostname.clone(),
        };
        merged.extend(run_checks(&checks, &check_ctx).for_host(&alias));
    }
    merged
}

/// Print a report and fail the command when it carries errors.
pub(crate) fn fail_on_errors(out: &Output, report: &ValidationReport) -> Result<(), AppError> {
    out.print_report(report);
    if report.has_errors() {
        return Err(AppError::ReportedErrors(report.error_count()));
    }
    Ok(())
}
