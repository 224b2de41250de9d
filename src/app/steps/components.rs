use std::path::PathBuf;

use crate::app::steps::{DeployContext, DeploymentStep};
use crate::app::transformer::{RewriteRules, Transformer, append_generated_marker};
use crate::domain::keys;
use crate::domain::{AppError, DeploymentMethod, PropertyValue};

fn write_component_properties(
    ctx: &DeployContext,
    component: &str,
    rules: &RewriteRules,
) -> Result<PathBuf, AppError> {
    let conf = ctx.component_conf(component)?;
    let sample = conf.join(format!("sample.{}.properties", component));
    let destination = conf.join(format!("{}.properties", component));
    let transformer = Transformer::new(sample, &destination, Some("#"));
    transformer.transform(rules)?;
    append_generated_marker(&destination)?;
    ctx.out.info(&format!("GENERATED FILE: {}", destination.display()));
    Ok(destination)
}

/// Render `host[port],host[port],...` for the manager membership list.
fn member_addresses(ctx: &DeployContext, port: &str) -> String {
    let mut members = Vec::new();
    if let Some(hosts) = ctx.config.get_map(&[keys::HOSTS]) {
        for value in hosts.values() {
            if let PropertyValue::Map(host) = value {
                if let Some(PropertyValue::Text(name)) = host.get(keys::HOST) {
                    members.push(format!("{}[{}]", name.trim(), port));
                }
            }
        }
    }
    if members.is_empty() {
        members.push(format!("{}[{}]", ctx.config.get_or(&[keys::HOST], "localhost"), port));
    }
    members.join(",")
}

/// Configures the cluster manager's properties file.
pub struct ManagerSteps;

impl DeploymentStep for ManagerSteps {
    fn name(&self) -> &'static str {
        "manager"
    }

    fn methods(&self) -> Vec<DeploymentMethod> {
        vec![DeploymentMethod::weighted("deploy_manager", 10)]
    }

    fn run(&self, method: &str, ctx: &mut DeployContext) -> Result<(), AppError> {
        if method != "deploy_manager" {
            return Err(AppError::step(method, "unknown manager method"));
        }
        let port = ctx.config.get_or(&[keys::MGR_LISTEN_PORT], "9997");
        let rules = RewriteRules::new()
            .set_property("manager.cluster.name", ctx.config.get_or(&[keys::CLUSTERNAME], ""))
            .set_property("manager.listen.port", port.clone())
            .set_property(
                "manager.policy.mode",
                ctx.config.get_or(&[keys::MGR_POLICY_MODE], "manual"),
            )
            .set_property("manager.members", member_addresses(ctx, &port));
        write_component_properties(ctx, "manager", &rules)?;
        Ok(())
    }
}

/// Configures the SQL router's properties file.
pub struct RouterSteps;

impl DeploymentStep for RouterSteps {
    fn name(&self) -> &'static str {
        "router"
    }

    fn methods(&self) -> Vec<DeploymentMethod> {
        vec![DeploymentMethod::weighted("deploy_router", 20)]
    }

    fn run(&self, method: &str, ctx: &mut DeployContext) -> Result<(), AppError> {
        if method != "deploy_router" {
            return Err(AppError::step(method, "unknown router method"));
        }
        let rules = RewriteRules::new()
            .set_property("router.cluster.name", ctx.config.get_or(&[keys::CLUSTERNAME], ""))
            .set_property(
                "router.listen.port",
                ctx.config.get_or(&[keys::ROUTER_LISTEN_PORT], "9999"),
            )
            .set_property("router.datasource.host", ctx.config.get_or(&[keys::REPL_DBHOST], ""))
            .set_property("router.datasource.port", ctx.config.get_or(&[keys::REPL_DBPORT], ""));
        write_component_properties(ctx, "router", &rules)?;
        Ok(())
    }
}

/// Configures the monitor's properties file.
pub struct MonitorSteps;

impl DeploymentStep for MonitorSteps {
    fn name(&self) -> &'static str {
        "monitor"
    }

    fn methods(&self) -> Vec<DeploymentMethod> {
        vec![DeploymentMethod::weighted("deploy_monitor", 30)]
    }

    fn run(&self, method: &str, ctx: &mut DeployContext) -> Result<(), AppError> {
        if method != "deploy_monitor" {
            return Err(AppError::step(method, "unknown monitor method"));
        }
        let rules = RewriteRules::new()
            .set_property("monitor.cluster.name", ctx.config.get_or(&[keys::CLUSTERNAME], ""))
            .set_property("monitor.host", ctx.config.get_or(&[keys::HOST], "localhost"))
            .set_property(
                "monitor.check.interval.millisecs",
                ctx.config.get_or(&[keys::MON_INTERVAL_MILLISECS], "3000"),
            );
        write_component_properties(ctx, "monitor", &rules)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::output::Output;
    use crate::app::steps::{ClusterSteps, StepRegistry};
    use crate::domain::PropertyStore;
    use crate::testing::MockRunner;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn manager_members_cover_every_configured_host() {
        let home = TempDir::new().unwrap();
        let mut config = PropertyStore::new();
        config.set(&["home_directory"], home.path().to_str().unwrap());
        config.set(&["cluster_name"], "alpha");
        config.set(&["mgr_listen_port"], "9997");
        config.set(&["hosts", "db1", "host_name"], "db1");
        config.set(&["hosts", "db2", "host_name"], "db2");
        let runner = MockRunner::new();
        let out = Output::default();
        let mut ctx = DeployContext::new(config, &runner, &out);

        let registry =
            StepRegistry::new(vec![Box::new(ClusterSteps), Box::new(ManagerSteps)]);
        let report = registry.deploy(&mut ctx);
        assert!(!report.has_errors(), "{:?}", report.entries());

        let body = fs::read_to_string(
            home.path().join("releases/clusterkit/manager/conf/manager.properties"),
        )
        .unwrap();
        assert!(body.contains("manager.members=db1[9997],db2[9997]\n"));
        assert!(body.contains("manager.cluster.name=alpha\n"));
    }
}
