mod deployment;
mod network;

pub use deployment::{
    OsSupportCheck, SshLoginCheck, WritableHomeDirectoryCheck, WritableTempDirectoryCheck,
};
pub use network::{HostnameCheck, PortAvailabilityCheck, WitnessPingCheck};

use crate::app::output::Output;
use crate::domain::keys;
use crate::domain::{AppError, PropertyStore, ValidationReport};
use crate::ports::{CommandOutput, CommandRunner, RemoteShell};

/// Environment handed to each pre-flight check: the per-host expanded store
/// plus the ports used to probe the live system.
pub struct CheckContext<'a> {
    pub config: &'a PropertyStore,
    pub runner: &'a dyn CommandRunner,
    pub remote: &'a dyn RemoteShell,
    pub out: &'a Output,
    pub local_hostname: String,
}

impl<'a> CheckContext<'a> {
    pub fn target_host(&self) -> String {
        self.config.get_or(&[keys::HOST], "localhost")
    }

    pub fn user(&self) -> String {
        self.config.get_or(&[keys::USERID], "")
    }

    pub fn is_remote(&self) -> bool {
        let host = self.target_host();
        host != "localhost" && host != "127.0.0.1" && host != self.local_hostname
    }

    /// Run a shell command against the target host, locally or over SSH.
    pub fn shell(&self, command: &str) -> Result<CommandOutput, AppError> {
        if self.is_remote() {
            self.remote.try_ssh(&self.user(), &self.target_host(), command)
        } else {
            self.runner.try_run("sh", &["-c", command])
        }
    }
}

/// One pre-flight check. `validate` emits findings into the shared report and
/// never aborts the pass; every check runs so the user sees all problems at
/// once.
pub trait ValidationCheck {
    fn title(&self) -> &'static str;

    fn weight(&self) -> i32 {
        0
    }

    fn enabled(&self, _ctx: &CheckContext) -> bool {
        true
    }

    fn validate(&self, ctx: &CheckContext, report: &mut ValidationReport);
}

/// The full pre-flight suite, in execution order.
pub fn standard_checks() -> Vec<Box<dyn ValidationCheck>> {
    vec![
        Box::new(SshLoginCheck),
        Box::new(HostnameCheck),
        Box::new(WritableTempDirectoryCheck),
        Box::new(WritableHomeDirectoryCheck),
        Box::new(OsSupportCheck),
        Box::new(PortAvailabilityCheck),
        Box::new(WitnessPingCheck),
    ]
}

/// Run every enabled check in ascending weight order, accumulating findings.
pub fn run_checks(checks: &[Box<dyn ValidationCheck>], ctx: &CheckContext) -> ValidationReport {
    let mut order: Vec<usize> = (0..checks.len()).collect();
    order.sort_by_key(|&i| checks[i].weight());

    let mut report = ValidationReport::new();
    for i in order {
        let check = &checks[i];
        if !check.enabled(ctx) {
            continue;
        }
        ctx.out.debug(&format!("Start: {}", check.title()));
        check.validate(ctx, &mut report);
        ctx.out.debug(&format!("Finish: {}", check.title()));
    }
    report.for_host(&ctx.target_host())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockRemote, MockRunner};

    struct FailingCheck(&'static str, i32);

    impl ValidationCheck for FailingCheck {
        fn title(&self) -> &'static str {
            self.0
        }

        fn weight(&self) -> i32 {
            self.1
        }

        fn validate(&self, _ctx: &CheckContext, report: &mut ValidationReport) {
            report.error(self.0, "failed");
        }
    }

    #[test]
    fn all_checks_run_and_failures_accumulate() {
        let store = PropertyStore::new();
        let runner = MockRunner::new();
        let remote = MockRemote::new();
        let ctx = CheckContext {
            config: &store,
            runner: &runner,
            remote: &remote,
            out: &Output::default(),
            local_hostname: "localhost".to_string(),
        };
        let checks: Vec<Box<dyn ValidationCheck>> = vec![
            Box::new(FailingCheck("second", 0)),
            Box::new(FailingCheck("first", -5)),
            Box::new(FailingCheck("third", 10)),
        ];

        let report = run_checks(&checks, &ctx);
        let sources: Vec<&str> = report.errors().map(|e| e.source.as_str()).collect();
        assert_eq!(sources, vec!["first", "second", "third"]);
        assert_eq!(report.error_count(), 3);
    }
}
