//! Replication prompts, both the top-level single-service form and the
//! per-service form scoped under `repl_services.<name>`. The master host
//! and port only apply to slaves; on a master they must be absent.

use crate::domain::keys;
use crate::domain::{Disabled, PromptDescriptor, PropertyStore, Validator};

pub const GROUP_WEIGHT: i32 = 0;

/// Replication prompts for a single-service deployment, keyed at the top
/// level of the store.
pub fn replication_prompts(store: &PropertyStore) -> Vec<PromptDescriptor> {
    let thl_dir =
        format!("{}/thl", store.get_or(&[keys::HOME_DIRECTORY], "/opt/clusterkit"));
    scoped_prompts(None, thl_dir)
}

/// The same prompt set scoped under `repl_services.<name>`, used when a
/// service command edits one replication service.
pub fn service_prompts(store: &PropertyStore, service: &str) -> Vec<PromptDescriptor> {
    let thl_dir = format!(
        "{}/thl/{}",
        store.get_or(&[keys::HOME_DIRECTORY], "/opt/clusterkit"),
        service
    );
    let mut prompts = scoped_prompts(Some(service), thl_dir);
    let prefix = format!("{}.{}", keys::REPL_SERVICES, service);
    prompts.push(
        PromptDescriptor::new(
            format!("{}.{}", prefix, keys::DEPLOYMENT_HOST),
            "Host alias this service deploys to",
            Validator::Identifier,
        )
        .with_weight(GROUP_WEIGHT)
        .enabled_if({
            let key = format!("{}.{}", prefix, keys::DEPLOYMENT_HOST);
            move |s: &PropertyStore| s.get_key(&key).is_some()
        }),
    );
    prompts
}

fn scoped_prompts(service: Option<&str>, thl_dir: String) -> Vec<PromptDescriptor> {
    let scoped = |key: &str| match service {
        Some(name) => format!("{}.{}.{}", keys::REPL_SERVICES, name, key),
        None => key.to_string(),
    };
    let role_key = scoped(keys::REPL_ROLE);
    let log_type_key = scoped(keys::REPL_LOG_TYPE);
    let is_slave = {
        let role_key = role_key.clone();
        move |s: &PropertyStore| s.get_key(&role_key) == Some("slave")
    };
    let is_disk_log = move |s: &PropertyStore| s.get_key(&log_type_key).unwrap_or("disk") == "disk";

    let prompts = vec![
        PromptDescriptor::new(
            role_key,
            "What is the replication role for this service? (master|slave)",
            Validator::DbmsRole,
        )
        .with_default("master"),
        PromptDescriptor::new(
            scoped(keys::REPL_MASTERHOST),
            "What is the master host for this service?",
            Validator::Hostname,
        )
        .enabled_if(is_slave.clone())
        .when_disabled(Disabled::Remove),
        PromptDescriptor::new(
            scoped(keys::REPL_MASTERPORT),
            "What is the master THL port for this service?",
            Validator::Integer,
        )
        .with_default("2112")
        .enabled_if(is_slave)
        .when_disabled(Disabled::Remove),
        PromptDescriptor::new(
            scoped(keys::REPL_THL_PORT),
            "Port to use for THL operations",
            Validator::Integer,
        )
        .with_default("2112"),
        PromptDescriptor::new(
            scoped(keys::REPL_LOG_TYPE),
            "Replicator event log storage (dbms|disk)",
            Validator::LogType,
        )
        .with_default("disk"),
        PromptDescriptor::new(
            scoped(keys::REPL_LOG_DIR),
            "Replicator log directory",
            Validator::FileName,
        )
        .with_default(thl_dir)
        .enabled_if(is_disk_log)
        .when_disabled(Disabled::Remove),
        PromptDescriptor::new(
            scoped(keys::REPL_BUFFER_SIZE),
            "Replicator block commit size (min 1, max 100)",
            Validator::buffer_size(),
        )
        .with_default("10")
        .advanced(),
        PromptDescriptor::new(
            scoped(keys::REPL_CHANNELS),
            "Number of replication channels to use for services",
            Validator::Integer,
        )
        .with_default("1")
        .advanced(),
        PromptDescriptor::new(
            scoped(keys::REPL_AUTOENABLE),
            "Auto-enable services after start-up",
            Validator::Boolean,
        )
        .with_default("true"),
        PromptDescriptor::new(
            scoped(keys::REPL_USE_BYTES),
            "Transfer string data using byte format",
            Validator::Boolean,
        )
        .with_default("true")
        .advanced(),
    ];
    prompts.into_iter().map(|p| p.with_weight(GROUP_WEIGHT)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_host_required_only_for_slaves() {
        let mut store = PropertyStore::new();
        store.set(&[keys::REPL_ROLE], "slave");

        let prompts = replication_prompts(&store);
        let master = prompts.iter().find(|p| p.key() == keys::REPL_MASTERHOST).unwrap();
        assert!(master.is_enabled(&store));
        assert_eq!(master.check_stored(&store).unwrap_err().message, "Value is missing");

        store.set(&[keys::REPL_ROLE], "master");
        assert!(!master.is_enabled(&store));
        assert!(master.check_stored(&store).is_ok());
    }

    #[test]
    fn master_host_on_a_master_is_flagged() {
        let mut store = PropertyStore::new();
        store.set(&[keys::REPL_ROLE], "master");
        store.set(&[keys::REPL_MASTERHOST], "db1");

        let prompts = replication_prompts(&store);
        let master = prompts.iter().find(|p| p.key() == keys::REPL_MASTERHOST).unwrap();
        assert_eq!(
            master.check_stored(&store).unwrap_err().message,
            "Value should not be given, remove it from the configuration"
        );
    }

    #[test]
    fn service_prompts_scope_under_the_service_name() {
        let mut store = PropertyStore::new();
        store.set(&[keys::REPL_SERVICES, "east", keys::REPL_ROLE], "slave");

        let prompts = service_prompts(&store, "east");
        let role = prompts.iter().find(|p| p.key() == "repl_services.east.repl_role").unwrap();
        assert!(role.check_stored(&store).is_ok());

        let master = prompts
            .iter()
            .find(|p| p.key() == "repl_services.east.repl_master_host")
            .unwrap();
        assert!(master.is_enabled(&store));
    }

    #[test]
    fn log_directory_follows_log_type() {
        let mut store = PropertyStore::new();
        store.set(&[keys::REPL_LOG_TYPE], "dbms");
        store.set(&[keys::REPL_LOG_DIR], "/tmp/thl");

        let prompts = replication_prompts(&store);
        let log_dir = prompts.iter().find(|p| p.key() == keys::REPL_LOG_DIR).unwrap();
        assert!(!log_dir.is_enabled(&store));
        assert!(log_dir.check_stored(&store).is_err());
    }
}
