use std::cell::Cell;

use crate::app::samples;
use crate::app::steps::{DeployContext, DeploymentStep, dataservice_rules};
use crate::app::steps::flavor::DbmsFlavor;
use crate::app::transformer::{
    LineMatcher, Rewrite, RewriteRules, Transformer, append_generated_marker, make_executable,
};
use crate::domain::keys;
use crate::domain::{AppError, DeploymentMethod};

/// Configures the replicator component: its service properties, the JVM
/// wrapper, its control script, and one static properties file per
/// replication service.
pub struct ReplicatorSteps {
    flavor: DbmsFlavor,
    dataservices_only: bool,
}

impl ReplicatorSteps {
    pub fn new(flavor: DbmsFlavor) -> Self {
        Self { flavor, dataservices_only: false }
    }

    /// Variant used by the per-service command: only the dataservice files
    /// are (re)written.
    pub fn dataservices_only(flavor: DbmsFlavor) -> Self {
        Self { flavor, dataservices_only: true }
    }
}

impl DeploymentStep for ReplicatorSteps {
    fn name(&self) -> &'static str {
        "replicator"
    }

    fn methods(&self) -> Vec<DeploymentMethod> {
        if self.dataservices_only {
            vec![DeploymentMethod::weighted("deploy_replication_dataservices", 50)]
        } else {
            vec![
                DeploymentMethod::new("deploy_replicator"),
                DeploymentMethod::weighted("deploy_replication_dataservices", 50),
            ]
        }
    }

    fn run(&self, method: &str, ctx: &mut DeployContext) -> Result<(), AppError> {
        match method {
            "deploy_replicator" => self.deploy_replicator(ctx),
            "deploy_replication_dataservices" => self.deploy_dataservices(ctx),
            other => Err(AppError::step(other, "unknown replicator method")),
        }
    }
}

impl ReplicatorSteps {
    fn deploy_replicator(&self, ctx: &mut DeployContext) -> Result<(), AppError> {
        self.write_services_properties(ctx)?;
        self.write_wrapper_conf(ctx)?;
        let script = self.write_control_script(ctx)?;
        ctx.write_svc_properties("replicator", &script)?;
        ctx.add_service(script);
        Ok(())
    }

    fn write_services_properties(&self, ctx: &DeployContext) -> Result<(), AppError> {
        let conf = ctx.component_conf("replicator")?;
        let transformer = Transformer::new(
            conf.join("sample.services.properties"),
            conf.join("services.properties"),
            Some("#"),
        );
        transformer.transform(&self.flavor.services_rules(&ctx.config))?;
        append_generated_marker(transformer.destination())?;
        ctx.out.info(&format!("GENERATED FILE: {}", transformer.destination().display()));
        Ok(())
    }

    fn write_wrapper_conf(&self, ctx: &DeployContext) -> Result<(), AppError> {
        let conf = ctx.component_conf("replicator")?;
        let rules = RewriteRules::new()
            .set_property(
                "wrapper.java.maxmemory",
                ctx.config.get_or(&[keys::REPL_JAVA_MEM_SIZE], "512"),
            )
            .set_property("wrapper.rmi.port", ctx.config.get_or(&[keys::REPL_RMI_PORT], "10000"));
        let transformer =
            Transformer::new(conf.join("sample.wrapper.conf"), conf.join("wrapper.conf"), Some("#"));
        transformer.transform(&rules)?;
        append_generated_marker(transformer.destination())?;
        Ok(())
    }

    /// The control script gets the deploy user and the component home. Only
    /// the first RUN_AS_USER assignment is rewritten; later occurrences in
    /// the script body must stay intact.
    fn write_control_script(
        &self,
        ctx: &DeployContext,
    ) -> Result<std::path::PathBuf, AppError> {
        let bin = ctx.basedir()?.join("replicator").join("bin");
        let user = ctx.config.get_or(&[keys::USERID], "");
        let service_home = ctx.basedir()?.join("replicator").display().to_string();

        let user_set = Cell::new(false);
        let rules = RewriteRules::new()
            .rule(
                LineMatcher::Contains("RUN_AS_USER=".to_string()),
                Rewrite::Map(Box::new(move |line| {
                    if user_set.get() {
                        Some(line.to_string())
                    } else {
                        user_set.set(true);
                        Some(format!("RUN_AS_USER={}", user))
                    }
                })),
            )
            .set_property("SERVICE_HOME", service_home);

        let transformer =
            Transformer::new(bin.join("sample.replicator.sh"), bin.join("replicator"), None);
        transformer.transform(&rules)?;
        make_executable(transformer.destination())?;
        append_generated_marker(transformer.destination())?;
        ctx.out.info(&format!("GENERATED FILE: {}", transformer.destination().display()));
        Ok(transformer.destination().to_path_buf())
    }

    fn deploy_dataservices(&self, ctx: &mut DeployContext) -> Result<(), AppError> {
        let conf = ctx.component_conf("replicator")?;
        let sample = conf.join("sample.static.properties");
        if !sample.exists() {
            ctx.mkdir_if_absent(&conf)?;
            samples::materialize("sample.static.properties", &sample)?;
        }
        let mut names: Vec<String> = ctx
            .config
            .get_map(&[keys::REPL_SERVICES])
            .map(|m| m.keys().cloned().collect())
            .unwrap_or_default();
        if names.is_empty() {
            // Single-service configuration: the replication settings live at
            // the top level and the service takes the cluster's name.
            names.push(ctx.config.get_or(&[keys::CLUSTERNAME], "default"));
        }

        for name in names {
            let rules = dataservice_rules(&name, &ctx.config);
            let transformer = Transformer::new(
                conf.join("sample.static.properties"),
                conf.join(format!("static-{}.properties", name)),
                Some("#"),
            );
            transformer.transform(&rules)?;
            append_generated_marker(transformer.destination())?;
            ctx.out.info(&format!("GENERATED FILE: {}", transformer.destination().display()));
        }
        Ok(())
    }
}
