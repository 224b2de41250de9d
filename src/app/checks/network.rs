use crate::app::checks::{CheckContext, ValidationCheck};
use crate::domain::keys;
use crate::domain::{PropertyValue, ValidationReport, Validator};

/// The deployment host name must be resolvable syntax, and multi-host
/// configurations cannot address members as localhost.
pub struct HostnameCheck;

impl ValidationCheck for HostnameCheck {
    fn title(&self) -> &'static str {
        "Hostname"
    }

    fn weight(&self) -> i32 {
        -4
    }

    fn validate(&self, ctx: &CheckContext, report: &mut ValidationReport) {
        let host = ctx.target_host();
        if let Err(failure) = Validator::Hostname.validate(&host) {
            report.key_error(self.title(), keys::HOST, Some(&host), failure.message);
            return;
        }
        let member_count = ctx.config.get_map(&[keys::HOSTS]).map(|m| m.len()).unwrap_or(0);
        if member_count > 1 && (host == "localhost" || host == "127.0.0.1") {
            report.error(
                self.title(),
                "Multi-host deployments cannot address a member as localhost",
            );
        } else {
            report.info(self.title(), format!("{} is usable", host));
        }
    }
}

/// Every listener port the configuration claims must not already be bound by
/// another process on the target host.
pub struct PortAvailabilityCheck;

impl PortAvailabilityCheck {
    fn configured_ports(ctx: &CheckContext) -> Vec<(String, String)> {
        let mut ports = Vec::new();
        for key in [
            keys::MGR_LISTEN_PORT,
            keys::ROUTER_LISTEN_PORT,
            keys::REPL_RMI_PORT,
            keys::REPL_THL_PORT,
        ] {
            if let Some(port) = ctx.config.get(&[key]) {
                ports.push((key.to_string(), port.to_string()));
            }
        }
        if let Some(services) = ctx.config.get_map(&[keys::REPL_SERVICES]) {
            for (name, value) in services {
                if let PropertyValue::Map(service) = value {
                    if let Some(PropertyValue::Text(port)) = service.get(keys::REPL_THL_PORT) {
                        ports.push((
                            format!("{}.{}.{}", keys::REPL_SERVICES, name, keys::REPL_THL_PORT),
                            port.clone(),
                        ));
                    }
                }
            }
        }
        ports
    }
}

impl ValidationCheck for PortAvailabilityCheck {
    fn title(&self) -> &'static str {
        "Port availability"
    }

    fn validate(&self, ctx: &CheckContext, report: &mut ValidationReport) {
        let listeners = match ctx.shell("ss -ltn") {
            Ok(output) if output.success() => output.stdout,
            _ => {
                report.warn(self.title(), "Unable to list listening ports, skipping");
                return;
            }
        };
        for (key, port) in Self::configured_ports(ctx) {
            let needle = format!(":{} ", port);
            if listeners.lines().any(|line| line.contains(&needle)) {
                report.key_error(
                    self.title(),
                    &key,
                    Some(&port),
                    format!("Port {} is already occupied by another process", port),
                );
            } else {
                report.info(self.title(), format!("Port {} is free", port));
            }
        }
    }
}

/// Witness hosts must answer a single ping.
pub struct WitnessPingCheck;

impl ValidationCheck for WitnessPingCheck {
    fn title(&self) -> &'static str {
        "Witness host"
    }

    fn enabled(&self, ctx: &CheckContext) -> bool {
        ctx.config.get(&[keys::WITNESSES]).is_some_and(|w| !w.is_empty())
    }

    fn validate(&self, ctx: &CheckContext, report: &mut ValidationReport) {
        let witnesses = ctx.config.get_or(&[keys::WITNESSES], "");
        for witness in witnesses.split(',').map(str::trim).filter(|w| !w.is_empty()) {
            let reachable = ctx
                .runner
                .try_run("ping", &["-c", "1", witness])
                .map(|o| o.success())
                .unwrap_or(false);
            if reachable {
                report.info(self.title(), format!("{} is pingable", witness));
            } else {
                report.key_error(
                    self.title(),
                    keys::WITNESSES,
                    Some(witness),
                    format!("Witness host {} is not reachable", witness),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::checks::CheckContext;
    use crate::app::output::Output;
    use crate::domain::PropertyStore;
    use crate::testing::{MockRemote, MockRunner};

    fn ctx_with<'a>(
        store: &'a PropertyStore,
        runner: &'a MockRunner,
        remote: &'a MockRemote,
        out: &'a Output,
    ) -> CheckContext<'a> {
        CheckContext {
            config: store,
            runner,
            remote,
            out,
            local_hostname: "cfghost".to_string(),
        }
    }

    #[test]
    fn occupied_port_is_an_error_free_port_is_not() {
        let mut store = PropertyStore::new();
        store.set(&["router_listen_port"], "9999");
        store.set(&["repl_services", "alpha", "repl_thl_port"], "2112");
        let runner = MockRunner::new()
            .respond("ss -ltn", 0, "LISTEN 0 128 0.0.0.0:9999 0.0.0.0:*");
        let remote = MockRemote::new();
        let out = Output::default();
        let ctx = ctx_with(&store, &runner, &remote, &out);

        let mut report = ValidationReport::new();
        PortAvailabilityCheck.validate(&ctx, &mut report);
        assert_eq!(report.error_count(), 1);
        let error = report.errors().next().unwrap();
        assert_eq!(error.key.as_deref(), Some("router_listen_port"));
    }

    #[test]
    fn single_service_thl_port_is_probed() {
        let mut store = PropertyStore::new();
        store.set(&["repl_thl_port"], "2112");
        let runner = MockRunner::new()
            .respond("ss -ltn", 0, "LISTEN 0 128 0.0.0.0:2112 0.0.0.0:*");
        let remote = MockRemote::new();
        let out = Output::default();
        let ctx = ctx_with(&store, &runner, &remote, &out);

        let mut report = ValidationReport::new();
        PortAvailabilityCheck.validate(&ctx, &mut report);
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.errors().next().unwrap().key.as_deref(), Some("repl_thl_port"));
    }

    #[test]
    fn unreachable_witness_is_collected_per_host() {
        let mut store = PropertyStore::new();
        store.set(&["witnesses"], "w1.example.com,w2.example.com");
        let runner = MockRunner::new().respond("ping -c 1 w2.example.com", 1, "");
        let remote = MockRemote::new();
        let out = Output::default();
        let ctx = ctx_with(&store, &runner, &remote, &out);

        let mut report = ValidationReport::new();
        WitnessPingCheck.validate(&ctx, &mut report);
        assert_eq!(report.error_count(), 1);
        assert!(report.errors().next().unwrap().message.contains("w2.example.com"));
    }

    #[test]
    fn localhost_member_in_multi_host_config_is_rejected() {
        let mut store = PropertyStore::new();
        store.set(&["host_name"], "localhost");
        store.set(&["hosts", "db1", "host_name"], "db1");
        store.set(&["hosts", "db2", "host_name"], "db2");
        let runner = MockRunner::new();
        let remote = MockRemote::new();
        let out = Output::default();
        let ctx = ctx_with(&store, &runner, &remote, &out);

        let mut report = ValidationReport::new();
        HostnameCheck.validate(&ctx, &mut report);
        assert!(report.has_errors());
    }

    #[test]
    fn ssh_login_compares_remote_user() {
        let mut store = PropertyStore::new();
        store.set(&["host_name"], "db2.example.com");
        store.set(&["userid"], "tungsten");
        let runner = MockRunner::new();
        let remote = MockRemote::new().respond("db2.example.com", "whoami", "someone_else");
        let out = Output::default();
        let ctx = ctx_with(&store, &runner, &remote, &out);

        assert!(crate::app::checks::SshLoginCheck.enabled(&ctx));
        let mut report = ValidationReport::new();
        crate::app::checks::SshLoginCheck.validate(&ctx, &mut report);
        assert!(report.has_errors());

        let remote_ok = MockRemote::new().respond("db2.example.com", "whoami", "tungsten");
        let ctx_ok = ctx_with(&store, &runner, &remote_ok, &out);
        let mut report_ok = ValidationReport::new();
        crate::app::checks::SshLoginCheck.validate(&ctx_ok, &mut report_ok);
        assert!(!report_ok.has_errors());
    }
}
