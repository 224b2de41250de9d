use crate::app::steps::{DeployContext, DeploymentStep};
use crate::app::transformer::RewriteRules;
use crate::domain::keys;
use crate::domain::{AppError, DeploymentMethod, PropertyStore};

/// Look up a per-service property, falling back to the global key of the
/// same name.
fn service_or_global<'a>(
    config: &'a PropertyStore,
    service: &str,
    key: &'a str,
) -> Option<&'a str> {
    config.get(&[keys::REPL_SERVICES, service, key]).or_else(|| config.get(&[key]))
}

/// Rewrite table for one replication service's static properties file.
pub fn dataservice_rules(service: &str, config: &PropertyStore) -> RewriteRules {
    let lookup = |key: &str, default: &str| {
        service_or_global(config, service, key).unwrap_or(default).to_string()
    };

    let mut rules = RewriteRules::new()
        .set_property("service.name", service)
        .set_property("replicator.role", lookup(keys::REPL_ROLE, "slave"))
        .set_property("replicator.auto_enable", lookup(keys::REPL_AUTOENABLE, "true"))
        .set_property("replicator.global.buffer.size", lookup(keys::REPL_BUFFER_SIZE, "10"))
        .set_property("replicator.channel_count", lookup(keys::REPL_CHANNELS, "1"))
        .set_property("replicator.store.thl.port", lookup(keys::REPL_THL_PORT, "2112"))
        .set_property("replicator.extractor.use_bytes", lookup(keys::REPL_USE_BYTES, "true"))
        .set_property("replicator.backup.method", lookup(keys::REPL_BACKUP_METHOD, "none"))
        .set_property(
            "replicator.backup.storage_dir",
            lookup(keys::REPL_BACKUP_STORAGE_DIR, ""),
        )
        .set_property("replicator.backup.retention", lookup(keys::REPL_BACKUP_RETENTION, "3"));

    if let Some(master) = service_or_global(config, service, keys::REPL_MASTERHOST) {
        rules = rules
            .set_property("replicator.master.connect.host", master)
            .set_property(
                "replicator.master.connect.port",
                lookup(keys::REPL_MASTERPORT, "2112"),
            );
    }

    if lookup(keys::REPL_LOG_TYPE, "disk") == "disk" {
        rules = rules
            .set_property("replicator.store.thl.storage", "disk")
            .set_property("replicator.store.thl.log_dir", lookup(keys::REPL_LOG_DIR, ""));
    } else {
        rules = rules
            .set_property("replicator.store.thl.storage", "dbms")
            .drop_property("replicator.store.thl.log_dir");
    }

    rules
}

/// Deletes the artifacts of one replication service. Selected when the
/// service command runs with --delete.
pub struct ServiceRemoveSteps;

impl DeploymentStep for ServiceRemoveSteps {
    fn name(&self) -> &'static str {
        "service-remove"
    }

    fn methods(&self) -> Vec<DeploymentMethod> {
        vec![DeploymentMethod::new("remove_dataservice")]
    }

    fn run(&self, method: &str, ctx: &mut DeployContext) -> Result<(), AppError> {
        if method != "remove_dataservice" {
            return Err(AppError::step(method, "unknown service-remove method"));
        }
        let service = ctx.config.require(&[keys::DEPLOYMENT_SERVICE])?;

        // The replicator only drops a service on restart. It may not be
        // running at all, so a failed stop is reported but not fatal.
        let script = ctx.basedir()?.join("replicator/bin/replicator");
        if script.exists() {
            ctx.add_service(script);
            if let Err(e) = crate::app::steps::stop_services(ctx) {
                ctx.out.warn(&format!("Could not stop the replicator: {}", e));
            }
        }

        let conf = ctx.component_conf("replicator")?;
        let path = conf.join(format!("static-{}.properties", service));
        if path.exists() {
            std::fs::remove_file(&path)?;
            ctx.out.info(&format!("REMOVED FILE: {}", path.display()));
        } else {
            ctx.out.warn(&format!("No generated file to remove: {}", path.display()));
        }
        Ok(())
    }
}
