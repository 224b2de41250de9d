use std::path::PathBuf;

use crate::app::AppContext;
use crate::app::commands::fail_on_errors;
use crate::app::deploy::Deployer;
use crate::app::pipeline::{PipelineOutcome, PromptPipeline};
use crate::app::prompts::{registry_for, service_prompts};
use crate::domain::keys;
use crate::domain::{
    AppError, PackageKind, PropertyStore, ServiceAction, ValidationReport,
};
use crate::ports::{CommandRunner, PromptIo, RemoteShell};

pub struct ServiceOptions {
    pub create: bool,
    pub delete: bool,
    pub update: bool,
    pub service_name: String,
    pub config: PathBuf,
    /// Validate supplied values instead of prompting for the rest.
    pub batch: bool,
    pub role: Option<String>,
    pub master_host: Option<String>,
    pub master_port: Option<String>,
    pub datasource: Option<String>,
    pub buffer_size: Option<String>,
    pub channels: Option<String>,
    pub thl_port: Option<String>,
    pub auto_enable: Option<String>,
}

impl ServiceOptions {
    fn action(&self) -> Result<ServiceAction, AppError> {
        match (self.create, self.delete, self.update) {
            (true, false, false) => Ok(ServiceAction::Create),
            (false, true, false) => Ok(ServiceAction::Delete),
            (false, false, true) => Ok(ServiceAction::Update),
            _ => Err(AppError::ServiceAction),
        }
    }

    /// Only flags the user actually passed land in the service block.
    fn flag_values(&self) -> Vec<(&'static str, &Option<String>)> {
        vec![
            (keys::REPL_ROLE, &self.role),
            (keys::REPL_MASTERHOST, &self.master_host),
            (keys::REPL_MASTERPORT, &self.master_port),
            (keys::REPL_DATASOURCE, &self.datasource),
            (keys::REPL_BUFFER_SIZE, &self.buffer_size),
            (keys::REPL_CHANNELS, &self.channels),
            (keys::REPL_THL_PORT, &self.thl_port),
            (keys::REPL_AUTOENABLE, &self.auto_enable),
        ]
    }
}

/// Create, update or delete one replication service in an installed
/// configuration, then replay the change on every host carrying it.
pub fn execute<R, S, P>(
    ctx: &mut AppContext<R, S, P>,
    options: &ServiceOptions,
) -> Result<(), AppError>
where
    R: CommandRunner,
    S: RemoteShell,
    P: PromptIo,
{
    let action = options.action()?;
    if !options.config.exists() {
        return Err(AppError::ConfigNotFound(options.config.display().to_string()));
    }
    let mut store = PropertyStore::load(&options.config)?;

    let name = options.service_name.as_str();
    let exists = store.get_map(&[keys::REPL_SERVICES, name]).is_some();
    match action {
        ServiceAction::Create if exists => {
            return Err(AppError::ServiceExists(name.to_string()));
        }
        ServiceAction::Update | ServiceAction::Delete if !exists => {
            return Err(AppError::ServiceNotFound(name.to_string()));
        }
        _ => {}
    }

    store.set(&[keys::DEPLOYMENT_SERVICE], name);

    if action != ServiceAction::Delete {
        for (key, value) in options.flag_values() {
            if let Some(value) = value {
                store.set(&[keys::REPL_SERVICES, name, key], value.clone());
            }
        }
        if collect_service_values(ctx, options, &mut store, name)?
            == PipelineOutcome::SavedEarly
        {
            store.remove(&[keys::DEPLOYMENT_SERVICE]);
            store.store(&options.config)?;
            ctx.out.info(&format!("Configuration saved: {}", options.config.display()));
            return Ok(());
        }
    }

    let mut report = ValidationReport::new();
    let pipeline = registry_for(&store, PackageKind::Service(action));
    pipeline.run_batch(&mut store, &mut report);
    pipeline.verify_no_unknown_keys(&store, &mut report);
    fail_on_errors(&ctx.out, &report)?;

    let deployer = Deployer {
        runner: &ctx.runner,
        remote: &ctx.remote,
        out: &ctx.out,
        local_hostname: ctx.local_hostname.clone(),
    };
    let report = deployer.deploy_all(&store, PackageKind::Service(action))?;
    ctx.out.print_report(&report);
    if report.has_errors() {
        return Err(AppError::ReportedErrors(report.error_count()));
    }

    // The deployed hosts saw the service; now the saved configuration can
    // reflect the removal.
    if action == ServiceAction::Delete {
        store.remove(&[keys::REPL_SERVICES, name]);
    }
    store.remove(&[keys::DEPLOYMENT_SERVICE]);
    store.store(&options.config)?;
    ctx.out.info(&format!("Replication service '{}' {}", name, match action {
        ServiceAction::Create => "created",
        ServiceAction::Update => "updated",
        ServiceAction::Delete => "deleted",
    }));
    Ok(())
}

/// Fill in the service block, interactively unless batch mode asked for
/// stored-value validation only. A save-and-exit reply surfaces to the
/// caller so nothing deploys.
fn collect_service_values<R, S, P>(
    ctx: &mut AppContext<R, S, P>,
    options: &ServiceOptions,
    store: &mut PropertyStore,
    name: &str,
) -> Result<PipelineOutcome, AppError>
where
    R: CommandRunner,
    S: RemoteShell,
    P: PromptIo,
{
    if options.batch {
        return Ok(PipelineOutcome::Completed);
    }
    let pipeline = PromptPipeline::new(service_prompts(store, name));
    pipeline.run_interactive(store, &mut ctx.io, true)
}
