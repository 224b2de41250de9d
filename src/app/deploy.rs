//! Multi-host dispatch. The top-level configuration may describe a whole
//! cluster under `hosts.*`; each target host gets its own narrowed copy of
//! the store and runs the step sequence against that copy. The local host
//! runs in-process, remote hosts receive the narrowed config over SSH and
//! replay the same command there.

use std::env;

use crate::app::output::Output;
use crate::app::steps::{DeployContext, StepRegistry};
use crate::domain::keys;
use crate::domain::{
    AppError, PackageKind, PropertyStore, ServiceAction, ValidationReport,
};
use crate::ports::{CommandRunner, RemoteShell};

/// Binary expected on each remote host's PATH.
const REMOTE_BIN: &str = "clusterkit";

/// Aliases of every host the configuration wants deployed, in stable order.
/// A configuration without a `hosts` block deploys the top-level host only.
pub fn target_hosts(config: &PropertyStore) -> Vec<String> {
    match config.get_map(&[keys::HOSTS]) {
        Some(hosts) => hosts.keys().cloned().collect(),
        None => vec![config.get_or(&[keys::HOST], "localhost")],
    }
}

/// Narrow the cluster-wide store down to one host: other hosts' blocks and
/// foreign replication services are dropped, `deployment_host` is pinned,
/// and the host's own block overlays the top level.
pub fn expand_host_config(config: &PropertyStore, alias: &str) -> PropertyStore {
    let mut expanded = config.dup();

    let other_hosts: Vec<String> = expanded
        .get_map(&[keys::HOSTS])
        .map(|hosts| hosts.keys().filter(|k| *k != alias).cloned().collect())
        .unwrap_or_default();
    for other in &other_hosts {
        expanded.remove(&[keys::HOSTS, other]);
    }

    let foreign_services: Vec<String> = expanded
        .get_map(&[keys::REPL_SERVICES])
        .map(|services| {
            services
                .keys()
                .filter(|svc| {
                    match expanded.get(&[keys::REPL_SERVICES, svc, keys::DEPLOYMENT_HOST]) {
                        Some(host) => host != alias,
                        None => false,
                    }
                })
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    for svc in &foreign_services {
        expanded.remove(&[keys::REPL_SERVICES, svc]);
    }

    expanded.set(&[keys::DEPLOYMENT_HOST], alias);

    if let Some(block) = config.get_map(&[keys::HOSTS, alias]).cloned() {
        for (key, value) in block {
            expanded.set_value(&[&key], value);
        }
    }

    expanded
}

/// Drives the per-host deployments. Hosts run one after another; a failing
/// host is recorded in the merged report and the remaining hosts still run.
pub struct Deployer<'a> {
    pub runner: &'a dyn CommandRunner,
    pub remote: &'a dyn RemoteShell,
    pub out: &'a Output,
    pub local_hostname: String,
}

impl Deployer<'_> {
    pub fn deploy_all(
        &self,
        config: &PropertyStore,
        kind: PackageKind,
    ) -> Result<ValidationReport, AppError> {
        let mut summary = ValidationReport::new();
        for alias in target_hosts(config) {
            let expanded = expand_host_config(config, &alias);
            if self.skip_host(&expanded, kind) {
                self.out.debug(&format!("Nothing to deploy on host: {}", alias));
                continue;
            }
            self.out.header(&format!("Deploying host: {}", alias));
            let report = self.deploy_host(&alias, expanded, kind)?;
            summary.extend(report.for_host(&alias));
        }
        Ok(summary)
    }

    /// Service actions only touch hosts whose narrowed store still carries
    /// the service in question.
    fn skip_host(&self, expanded: &PropertyStore, kind: PackageKind) -> bool {
        if !matches!(kind, PackageKind::Service(_)) {
            return false;
        }
        match expanded.get(&[keys::DEPLOYMENT_SERVICE]) {
            Some(service) => expanded.get_map(&[keys::REPL_SERVICES, service]).is_none(),
            None => false,
        }
    }

    fn deploy_host(
        &self,
        alias: &str,
        expanded: PropertyStore,
        kind: PackageKind,
    ) -> Result<ValidationReport, AppError> {
        let host = expanded.get_or(&[keys::HOST], alias);
        if host == "localhost" || host == "127.0.0.1" || host == self.local_hostname {
            let registry = StepRegistry::for_deployment(&expanded, kind);
            let mut ctx = DeployContext::new(expanded, self.runner, self.out);
            Ok(registry.deploy(&mut ctx))
        } else {
            self.deploy_remote(alias, &host, &expanded, kind)
        }
    }

    /// Push the narrowed config and replay the command on the remote host.
    /// A service create is replayed as an update, since the pushed config
    /// already records the service.
    fn deploy_remote(
        &self,
        alias: &str,
        host: &str,
        expanded: &PropertyStore,
        kind: PackageKind,
    ) -> Result<ValidationReport, AppError> {
        let mut report = ValidationReport::new();
        let user = expanded.get_or(&[keys::USERID], "");
        let temp = expanded.get_or(&[keys::TEMP_DIRECTORY], "/tmp");
        let remote_cfg = format!("{}/clusterkit-{}.cfg", temp, alias);

        let local_cfg = env::temp_dir().join(format!("clusterkit-{}.cfg", alias));
        expanded.store(&local_cfg)?;

        let command = match kind {
            PackageKind::Install => {
                format!("{} install -b -c {}", REMOTE_BIN, remote_cfg)
            }
            PackageKind::Service(action) => {
                let service = expanded.require(&[keys::DEPLOYMENT_SERVICE])?;
                let flag = match action {
                    ServiceAction::Create | ServiceAction::Update => "-U",
                    ServiceAction::Delete => "-D",
                };
                format!("{} service {} {} -b -c {}", REMOTE_BIN, flag, service, remote_cfg)
            }
            PackageKind::ValidateOnly => {
                format!("{} validate -c {}", REMOTE_BIN, remote_cfg)
            }
        };

        let outcome = self
            .remote
            .push_file(&user, host, &local_cfg, &remote_cfg)
            .and_then(|()| self.remote.ssh(&user, host, &command));
        match outcome {
            Ok(stdout) => {
                if !stdout.is_empty() {
                    self.out.info(&stdout);
                }
                report.info("remote-deploy", format!("Deployed remote host: {}", host));
            }
            Err(e) => report.error("remote-deploy", e.to_string()),
        }
        if let Err(e) = std::fs::remove_file(&local_cfg) {
            self.out.debug(&format!("Could not remove staged config: {}", e));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockRemote, MockRunner};

    fn cluster_config() -> PropertyStore {
        let mut config = PropertyStore::new();
        config.set(&[keys::USERID], "tungsten");
        config.set(&[keys::HOME_DIRECTORY], "/opt/ck");
        config.set(&[keys::HOSTS, "alpha", keys::HOST], "alpha.example.com");
        config.set(&[keys::HOSTS, "alpha", keys::REPL_ROLE], "master");
        config.set(&[keys::HOSTS, "beta", keys::HOST], "beta.example.com");
        config.set(&[keys::HOSTS, "beta", keys::REPL_ROLE], "slave");
        config.set(&[keys::REPL_SERVICES, "east", keys::DEPLOYMENT_HOST], "alpha");
        config.set(&[keys::REPL_SERVICES, "west", keys::DEPLOYMENT_HOST], "beta");
        config
    }

    #[test]
    fn expansion_narrows_to_one_host() {
        let config = cluster_config();
        let expanded = expand_host_config(&config, "alpha");

        assert_eq!(expanded.get(&[keys::DEPLOYMENT_HOST]), Some("alpha"));
        assert_eq!(expanded.get(&[keys::HOST]), Some("alpha.example.com"));
        assert_eq!(expanded.get(&[keys::REPL_ROLE]), Some("master"));
        assert!(expanded.get_map(&[keys::HOSTS, "alpha"]).is_some());
        assert!(expanded.get_map(&[keys::HOSTS, "beta"]).is_none());
        assert!(expanded.get_map(&[keys::REPL_SERVICES, "east"]).is_some());
        assert!(expanded.get_map(&[keys::REPL_SERVICES, "west"]).is_none());
    }

    #[test]
    fn expansion_keeps_unpinned_services() {
        let mut config = cluster_config();
        config.set(&[keys::REPL_SERVICES, "everywhere", keys::REPL_ROLE], "slave");
        let expanded = expand_host_config(&config, "beta");

        assert!(expanded.get_map(&[keys::REPL_SERVICES, "everywhere"]).is_some());
        assert!(expanded.get_map(&[keys::REPL_SERVICES, "west"]).is_some());
    }

    #[test]
    fn single_host_config_targets_top_level_host() {
        let mut config = PropertyStore::new();
        config.set(&[keys::HOST], "db1");
        assert_eq!(target_hosts(&config), vec!["db1".to_string()]);

        let expanded = expand_host_config(&config, "db1");
        assert_eq!(expanded.get(&[keys::DEPLOYMENT_HOST]), Some("db1"));
    }

    #[test]
    fn remote_hosts_get_config_and_command() {
        let config = cluster_config();
        let runner = MockRunner::new();
        let remote = MockRemote::new();
        let out = Output::new(false, true);
        let deployer = Deployer {
            runner: &runner,
            remote: &remote,
            out: &out,
            local_hostname: "control".to_string(),
        };

        let report = deployer.deploy_all(&config, PackageKind::ValidateOnly).unwrap();
        assert!(!report.has_errors());

        let calls = remote.calls();
        assert!(calls.iter().any(|c| c.contains("alpha.example.com")
            && c.contains("/tmp/clusterkit-alpha.cfg")));
        assert!(calls.iter().any(|c| c.contains("beta.example.com")
            && c.contains("clusterkit validate -c /tmp/clusterkit-beta.cfg")));
    }

    #[test]
    fn failing_host_does_not_stop_the_rest() {
        let config = cluster_config();
        let runner = MockRunner::new();
        let remote = MockRemote::new().fail_host("alpha.example.com");
        let out = Output::new(false, true);
        let deployer = Deployer {
            runner: &runner,
            remote: &remote,
            out: &out,
            local_hostname: "control".to_string(),
        };

        let report = deployer.deploy_all(&config, PackageKind::ValidateOnly).unwrap();
        assert_eq!(report.error_count(), 1);

        let calls = remote.calls();
        assert!(calls.iter().any(|c| c.contains("beta.example.com")));
    }
}
