use crate::app::samples;
use crate::app::steps::{DeployContext, DeploymentStep};
use crate::domain::keys;
use crate::domain::{AppError, DeploymentMethod};

/// Shared scaffolding every deployment needs before any component step runs:
/// the home tree, the release tree, and the materialized sample templates.
pub struct ClusterSteps;

const COMPONENT_DIRS: [&str; 5] = ["replicator", "manager", "router", "monitor", "cluster-home"];

impl DeploymentStep for ClusterSteps {
    fn name(&self) -> &'static str {
        "cluster"
    }

    fn methods(&self) -> Vec<DeploymentMethod> {
        vec![
            DeploymentMethod::weighted("build_home_directory", -40),
            DeploymentMethod::weighted("create_release", -30),
            DeploymentMethod::weighted("deploy_config_files", -20),
        ]
    }

    fn run(&self, method: &str, ctx: &mut DeployContext) -> Result<(), AppError> {
        match method {
            "build_home_directory" => build_home_directory(ctx),
            "create_release" => create_release(ctx),
            "deploy_config_files" => deploy_config_files(ctx),
            other => Err(AppError::step(other, "unknown cluster method")),
        }
    }
}

fn build_home_directory(ctx: &mut DeployContext) -> Result<(), AppError> {
    let home = ctx.config.require(&[keys::HOME_DIRECTORY])?;
    let home = std::path::Path::new(&home);
    for sub in ["configs", "releases", "service_logs", "share"] {
        ctx.mkdir_if_absent(&home.join(sub))?;
    }
    Ok(())
}

fn create_release(ctx: &mut DeployContext) -> Result<(), AppError> {
    let basedir = ctx.basedir()?;
    for component in COMPONENT_DIRS {
        ctx.mkdir_if_absent(&basedir.join(component).join("conf"))?;
        ctx.mkdir_if_absent(&basedir.join(component).join("bin"))?;
    }
    ctx.mkdir_if_absent(&basedir.join("replicator").join("log"))?;
    ctx.mkdir_if_absent(&basedir.join("cluster-home/conf/cluster"))?;
    Ok(())
}

/// Materialize the embedded sample templates into each component's conf/bin
/// tree and checkpoint the expanded host configuration.
fn deploy_config_files(ctx: &mut DeployContext) -> Result<(), AppError> {
    let basedir = ctx.basedir()?;
    let placements = [
        ("sample.services.properties", "replicator/conf"),
        ("sample.static.properties", "replicator/conf"),
        ("sample.wrapper.conf", "replicator/conf"),
        ("sample.replicator.sh", "replicator/bin"),
        ("sample.manager.properties", "manager/conf"),
        ("sample.router.properties", "router/conf"),
        ("sample.monitor.properties", "monitor/conf"),
    ];
    for (name, dir) in placements {
        samples::materialize(name, &basedir.join(dir).join(name))?;
    }

    let config_file = ctx.host_config_file()?;
    if let Some(parent) = config_file.parent() {
        ctx.mkdir_if_absent(parent)?;
    }
    ctx.config.store(&config_file)?;
    ctx.out.debug(&format!("Checkpointed host configuration: {}", config_file.display()));
    Ok(())
}
