//! Host- and installation-level prompts: where the release lands, which
//! system user owns it, and which optional cluster components take part.

use std::env;

use crate::domain::keys;
use crate::domain::{Disabled, PromptDescriptor, Validator};

pub const GROUP_WEIGHT: i32 = -40;

fn whoami() -> String {
    env::var("USER").unwrap_or_else(|_| "tungsten".to_string())
}

fn default_home() -> String {
    match env::var("HOME") {
        Ok(home) => format!("{}/clusterkit", home),
        Err(_) => "/opt/clusterkit".to_string(),
    }
}

/// Prompts every deployment answers, regardless of database platform.
pub fn deployment_prompts() -> Vec<PromptDescriptor> {
    let mut prompts = vec![
        PromptDescriptor::new(keys::HOST, "DNS hostname", Validator::Hostname)
            .with_default("localhost")
            .with_help("The hostname other cluster members use to reach this host")
            .no_previous(),
        PromptDescriptor::new(keys::IP_ADDRESS, "IP address", Validator::Hostname)
            .enabled_if(|s| s.get(&[keys::IP_ADDRESS]).is_some()),
        PromptDescriptor::new(keys::USERID, "System User", Validator::Identifier)
            .with_default(whoami()),
        PromptDescriptor::new(keys::HOME_DIRECTORY, "Installation directory", Validator::FileName)
            .with_default(default_home())
            .with_help("Releases, configuration and logs are created under this directory"),
        PromptDescriptor::new(keys::TEMP_DIRECTORY, "Temporary Directory", Validator::FileName)
            .with_default("/tmp")
            .advanced(),
        PromptDescriptor::new(keys::CLUSTERNAME, "Cluster name", Validator::Identifier)
            .with_default("default"),
        PromptDescriptor::new(
            keys::DBMS_TYPE,
            "Database type (mysql|postgresql|oracle)",
            Validator::DbmsType,
        )
        .with_default("mysql"),
        PromptDescriptor::new(
            keys::ROOT_PREFIX,
            "Run root commands via sudo",
            Validator::Boolean,
        )
        .with_default("false"),
        PromptDescriptor::new(
            keys::SVC_INSTALL,
            "Install service start scripts",
            Validator::Boolean,
        )
        .with_default("false")
        .with_help("Copies boot scripts into /etc/init.d, requires root or sudo"),
        PromptDescriptor::new(
            keys::SVC_START,
            "Start services after configuration",
            Validator::Boolean,
        )
        .with_default("true"),
        PromptDescriptor::new(
            keys::WITNESSES,
            "Comma-delimited list of witness hosts",
            Validator::Any,
        )
        .enabled_if(|s| s.get(&[keys::WITNESSES]).is_some()),
        PromptDescriptor::new(
            keys::REPL_JAVA_MEM_SIZE,
            "Replicator Java heap memory size in Mb (min 128)",
            Validator::java_mem_size(),
        )
        .with_default("512")
        .advanced(),
        PromptDescriptor::new(keys::REPL_RMI_PORT, "Replication RMI port", Validator::Integer)
            .with_default("10000")
            .advanced(),
        PromptDescriptor::new(
            keys::DEPLOYMENT_HOST,
            "Host alias being deployed",
            Validator::Identifier,
        )
        .enabled_if(|s| s.get(&[keys::DEPLOYMENT_HOST]).is_some()),
        PromptDescriptor::new(
            keys::DEPLOYMENT_SERVICE,
            "Replication service being configured",
            Validator::Identifier,
        )
        .enabled_if(|s| s.get(&[keys::DEPLOYMENT_SERVICE]).is_some()),
    ];
    prompts.extend(component_prompts());
    prompts.into_iter().map(|p| p.with_weight(GROUP_WEIGHT)).collect()
}

/// Optional cluster components. Each is keyed on its listen-port (or
/// interval) setting: absent means the component is not deployed, so the
/// dependent prompts disable themselves and strip their keys.
fn component_prompts() -> Vec<PromptDescriptor> {
    vec![
        PromptDescriptor::new(keys::MGR_LISTEN_PORT, "Manager listen port", Validator::Integer)
            .enabled_if(|s| s.get(&[keys::MGR_LISTEN_PORT]).is_some()),
        PromptDescriptor::new(
            keys::MGR_POLICY_MODE,
            "Manager policy mode (manual|automatic)",
            Validator::PolicyMode,
        )
        .with_default("automatic")
        .enabled_if(|s| s.get(&[keys::MGR_LISTEN_PORT]).is_some())
        .when_disabled(Disabled::Remove),
        PromptDescriptor::new(keys::ROUTER_LISTEN_PORT, "Router listen port", Validator::Integer)
            .enabled_if(|s| s.get(&[keys::ROUTER_LISTEN_PORT]).is_some()),
        PromptDescriptor::new(
            keys::MON_INTERVAL_MILLISECS,
            "Replication monitor interval in milliseconds",
            Validator::Integer,
        )
        .enabled_if(|s| s.get(&[keys::MON_INTERVAL_MILLISECS]).is_some()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PropertyStore;

    #[test]
    fn optional_components_stay_silent_when_absent() {
        let store = PropertyStore::new();
        for prompt in deployment_prompts() {
            if prompt.key() == keys::MGR_LISTEN_PORT || prompt.key() == keys::MGR_POLICY_MODE {
                assert!(!prompt.is_enabled(&store), "{} should be disabled", prompt.key());
                assert!(prompt.check_stored(&store).is_ok());
            }
        }
    }

    #[test]
    fn policy_mode_follows_manager_port() {
        let mut store = PropertyStore::new();
        store.set(&[keys::MGR_LISTEN_PORT], "9997");
        let prompts = deployment_prompts();
        let policy = prompts.iter().find(|p| p.key() == keys::MGR_POLICY_MODE).unwrap();
        assert!(policy.is_enabled(&store));
        assert!(policy.check_stored(&store).is_ok());
    }
}
