use std::path::PathBuf;

use crate::app::AppContext;
use crate::app::commands::{fail_on_errors, preflight};
use crate::app::deploy::Deployer;
use crate::app::pipeline::PipelineOutcome;
use crate::app::prompts::registry_for;
use crate::domain::{AppError, PackageKind, PropertyStore, ValidationReport};
use crate::ports::{CommandRunner, PromptIo, RemoteShell};

pub struct InstallOptions {
    /// Validate stored values instead of prompting.
    pub batch: bool,
    /// Ask the tuning prompts instead of taking their defaults.
    pub advanced: bool,
    pub config: PathBuf,
    /// Continue to deployment even when pre-flight checks report errors.
    pub force: bool,
    pub validate_only: bool,
    pub no_deploy: bool,
}

/// Collect the configuration, validate every target host, then fan the
/// deployment out.
pub fn execute<R, S, P>(
    ctx: &mut AppContext<R, S, P>,
    options: &InstallOptions,
) -> Result<(), AppError>
where
    R: CommandRunner,
    S: RemoteShell,
    P: PromptIo,
{
    let mut store = if options.config.exists() {
        PropertyStore::load(&options.config)?
    } else {
        PropertyStore::new()
    };

    let pipeline = registry_for(&store, PackageKind::Install);
    let mut report = ValidationReport::new();
    if options.batch {
        pipeline.run_batch(&mut store, &mut report);
    } else {
        if let PipelineOutcome::SavedEarly =
            pipeline.run_interactive(&mut store, &mut ctx.io, options.advanced)?
        {
            store.store(&options.config)?;
            ctx.out.info(&format!("Configuration saved: {}", options.config.display()));
            return Ok(());
        }
    }
    pipeline.verify_no_unknown_keys(&store, &mut report);
    fail_on_errors(&ctx.out, &report)?;

    store.store(&options.config)?;
    ctx.out.info(&format!("Configuration saved: {}", options.config.display()));

    ctx.out.header("Validating hosts");
    let report = preflight(ctx, &store);
    ctx.out.print_report(&report);
    if report.has_errors() {
        if options.force {
            ctx.out.warn("Continuing past validation errors because of --force");
        } else {
            return Err(AppError::ReportedErrors(report.error_count()));
        }
    }

    if options.validate_only || options.no_deploy {
        return Ok(());
    }

    ctx.out.header("Deploying");
    let deployer = Deployer {
        runner: &ctx.runner,
        remote: &ctx.remote,
        out: &ctx.out,
        local_hostname: ctx.local_hostname.clone(),
    };
    let report = deployer.deploy_all(&store, PackageKind::Install)?;
    ctx.out.print_report(&report);
    if report.has_errors() {
        return Err(AppError::ReportedErrors(report.error_count()));
    }
    ctx.out.info("Installation complete");
    Ok(())
}
