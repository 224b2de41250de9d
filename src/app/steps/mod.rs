mod cluster;
mod components;
mod dataservice;
mod flavor;
mod replicator;
mod services;

pub use cluster::ClusterSteps;
pub use components::{ManagerSteps, MonitorSteps, RouterSteps};
pub use dataservice::{ServiceRemoveSteps, dataservice_rules};
pub use flavor::DbmsFlavor;
pub use replicator::ReplicatorSteps;
pub use services::{ServicesSteps, stop_services};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::app::output::Output;
use crate::app::transformer::make_executable;
use crate::domain::keys;
use crate::domain::{
    AppError, DbmsType, DeploymentMethod, PackageKind, PropertyStore, ServiceAction,
    ValidationReport,
};
use crate::ports::CommandRunner;

/// Shared execution context for deployment steps: the per-host expanded
/// store plus the accumulated service list. Steps always run on the host
/// being deployed; remote hosts are reached by dispatching the whole binary
/// over SSH.
pub struct DeployContext<'a> {
    pub config: PropertyStore,
    pub runner: &'a dyn CommandRunner,
    pub out: &'a Output,
    services: Vec<PathBuf>,
}

impl<'a> DeployContext<'a> {
    pub fn new(config: PropertyStore, runner: &'a dyn CommandRunner, out: &'a Output) -> Self {
        Self { config, runner, out, services: Vec::new() }
    }

    /// Root of the release being configured.
    pub fn basedir(&self) -> Result<PathBuf, AppError> {
        let home = self.config.require(&[keys::HOME_DIRECTORY])?;
        Ok(Path::new(&home).join("releases").join("clusterkit"))
    }

    pub fn component_conf(&self, component: &str) -> Result<PathBuf, AppError> {
        Ok(self.basedir()?.join(component).join("conf"))
    }

    /// Where the expanded host configuration is checkpointed.
    pub fn host_config_file(&self) -> Result<PathBuf, AppError> {
        let home = self.config.require(&[keys::HOME_DIRECTORY])?;
        Ok(Path::new(&home).join("configs").join("clusterkit.cfg"))
    }

    pub fn mkdir_if_absent(&self, dir: &Path) -> Result<(), AppError> {
        if dir.exists() {
            if dir.is_dir() {
                self.out.debug(&format!("Found directory, no need to create: {}", dir.display()));
                return Ok(());
            }
            return Err(AppError::StepFailed {
                step: "mkdir".to_string(),
                details: format!("Directory already exists as a file: {}", dir.display()),
            });
        }
        self.out.debug(&format!("Creating missing directory: {}", dir.display()));
        fs::create_dir_all(dir)?;
        Ok(())
    }

    /// Command used to drive a boot script, honoring the root prefix.
    pub fn svc_command(&self, boot_script: &Path) -> String {
        let prefix = self.config.get_or(&[keys::ROOT_PREFIX], "");
        if prefix == "true" || prefix == "sudo" {
            format!("sudo {}", boot_script.display())
        } else {
            boot_script.display().to_string()
        }
    }

    /// Register an OS-level service control script. Start order is
    /// registration order; stop/uninstall order is the exact reverse.
    pub fn add_service(&mut self, boot_script: PathBuf) {
        self.services.push(boot_script);
    }

    pub fn services(&self) -> &[PathBuf] {
        &self.services
    }

    /// Generate a cluster service properties file for a registered service.
    pub fn write_svc_properties(&self, name: &str, boot_script: &Path) -> Result<(), AppError> {
        let cluster = self.config.get_or(&[keys::CLUSTERNAME], "default");
        let dir = self
            .basedir()?
            .join("cluster-home/conf/cluster")
            .join(&cluster)
            .join("service");
        self.mkdir_if_absent(&dir)?;

        let path = dir.join(format!("{}.properties", name));
        let command = self.svc_command(boot_script);
        let mut content = format!("# {}.properties\n", name);
        content.push_str(&format!("name={}\n", name));
        content.push_str(&format!("command.start={} start\n", command));
        content.push_str(&format!("command.stop={} stop\n", command));
        content.push_str(&format!("command.restart={} restart\n", command));
        content.push_str(&format!("command.status={} status\n", command));
        content.push_str(&format!("# AUTO-CONFIGURED: {}\n", Local::now().to_rfc3339()));
        fs::write(&path, content)?;
        make_executable(&path)?;
        self.out.info(&format!("GENERATED FILE: {}", path.display()));
        Ok(())
    }
}

/// One pluggable module contributing weighted, named operations to a
/// deployment.
pub trait DeploymentStep {
    fn name(&self) -> &'static str;

    fn methods(&self) -> Vec<DeploymentMethod>;

    fn run(&self, method: &str, ctx: &mut DeployContext) -> Result<(), AppError>;
}

/// Ordered collection of step providers selected by database kind and
/// command variant.
pub struct StepRegistry {
    providers: Vec<Box<dyn DeploymentStep>>,
}

impl StepRegistry {
    pub fn new(providers: Vec<Box<dyn DeploymentStep>>) -> Self {
        Self { providers }
    }

    /// Data-driven module selection: the database platform picks the rule
    /// flavor, the package kind picks which providers take part.
    pub fn for_deployment(config: &PropertyStore, kind: PackageKind) -> Self {
        let dbms = config
            .get(&[keys::DBMS_TYPE])
            .and_then(DbmsType::parse)
            .unwrap_or(DbmsType::Mysql);
        let flavor = DbmsFlavor::new(dbms);

        let mut providers: Vec<Box<dyn DeploymentStep>> = Vec::new();
        match kind {
            PackageKind::Install => {
                providers.push(Box::new(ClusterSteps));
                providers.push(Box::new(ReplicatorSteps::new(flavor)));
                if config.get(&[keys::MGR_LISTEN_PORT]).is_some() {
                    providers.push(Box::new(ManagerSteps));
                }
                if config.get(&[keys::ROUTER_LISTEN_PORT]).is_some() {
                    providers.push(Box::new(RouterSteps));
                }
                if config.get(&[keys::MON_INTERVAL_MILLISECS]).is_some() {
                    providers.push(Box::new(MonitorSteps));
                }
                providers.push(Box::new(ServicesSteps));
            }
            PackageKind::Service(ServiceAction::Create | ServiceAction::Update) => {
                providers.push(Box::new(ReplicatorSteps::dataservices_only(flavor)));
                providers.push(Box::new(ServicesSteps));
            }
            PackageKind::Service(ServiceAction::Delete) => {
                providers.push(Box::new(ServiceRemoveSteps));
            }
            PackageKind::ValidateOnly => {}
        }
        Self::new(providers)
    }

    /// Execution plan: every provider's methods, ascending by weight, stable
    /// for ties.
    fn plan(&self) -> Vec<(usize, DeploymentMethod)> {
        let mut plan: Vec<(usize, DeploymentMethod)> = self
            .providers
            .iter()
            .enumerate()
            .flat_map(|(i, p)| p.methods().into_iter().map(move |m| (i, m)))
            .collect();
        plan.sort_by_key(|(_, method)| method.weight);
        plan
    }

    /// Names in execution order, for previews and tests.
    pub fn method_order(&self) -> Vec<&'static str> {
        self.plan().into_iter().map(|(_, m)| m.name).collect()
    }

    /// Run the whole step sequence. The first failing step aborts the
    /// remainder for this host; already-applied side effects stay in place.
    pub fn deploy(&self, ctx: &mut DeployContext) -> ValidationReport {
        let mut report = ValidationReport::new();
        for (provider, method) in self.plan() {
            let step = &self.providers[provider];
            ctx.out.debug(&format!("Step starting: {} ({})", method.name, step.name()));
            match step.run(method.name, ctx) {
                Ok(()) => ctx.out.debug(&format!("Step finished: {}", method.name)),
                Err(e) => {
                    report.error(method.name, e.to_string());
                    break;
                }
            }
        }
        report
    }
}
