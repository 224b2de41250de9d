use crate::app::checks::{CheckContext, ValidationCheck};
use crate::domain::keys;
use crate::domain::ValidationReport;

/// The configuration host must be able to reach each member over SSH with
/// key authentication, landing as the configured deploy user.
pub struct SshLoginCheck;

impl ValidationCheck for SshLoginCheck {
    fn title(&self) -> &'static str {
        "SSH login"
    }

    fn weight(&self) -> i32 {
        -5
    }

    fn enabled(&self, ctx: &CheckContext) -> bool {
        ctx.is_remote()
    }

    fn validate(&self, ctx: &CheckContext, report: &mut ValidationReport) {
        let expected = ctx.user();
        match ctx.remote.try_ssh(&expected, &ctx.target_host(), "whoami") {
            Ok(output) if output.success() && output.stdout == expected => {
                report.info(self.title(), "SSH login successful");
            }
            _ => {
                report.error(
                    self.title(),
                    format!(
                        "Unable to SSH to {} as {}. Ensure that the host is running and that you can login via SSH using key authentication",
                        ctx.target_host(),
                        expected
                    ),
                );
            }
        }
    }
}

/// Probe a directory on the target host: create it if needed, then confirm it
/// is a writable directory.
fn check_writable_directory(
    title: &str,
    dir: &str,
    ctx: &CheckContext,
    report: &mut ValidationReport,
) {
    if dir.is_empty() {
        report.error(title, "No directory is configured");
        return;
    }
    if ctx.shell(&format!("mkdir -p {}", dir)).map(|o| !o.success()).unwrap_or(true) {
        report.error(title, format!("There was an issue creating {}", dir));
        return;
    }
    let is_dir = ctx
        .shell(&format!("if [ -d {} ]; then echo 0; else echo 1; fi", dir))
        .map(|o| o.stdout == "0")
        .unwrap_or(false);
    if !is_dir {
        report.error(title, format!("{} is not a directory", dir));
        return;
    }
    let writable = ctx
        .shell(&format!("if [ -w {} ]; then echo 0; else echo 1; fi", dir))
        .map(|o| o.stdout == "0")
        .unwrap_or(false);
    if writable {
        report.info(title, format!("{} is writeable", dir));
    } else {
        report.error(title, format!("{} is not writeable", dir));
    }
}

pub struct WritableTempDirectoryCheck;

impl ValidationCheck for WritableTempDirectoryCheck {
    fn title(&self) -> &'static str {
        "Writeable temp directory"
    }

    fn validate(&self, ctx: &CheckContext, report: &mut ValidationReport) {
        let dir = ctx.config.get_or(&[keys::TEMP_DIRECTORY], "/tmp");
        check_writable_directory(self.title(), &dir, ctx, report);
    }
}

pub struct WritableHomeDirectoryCheck;

impl ValidationCheck for WritableHomeDirectoryCheck {
    fn title(&self) -> &'static str {
        "Writeable home directory"
    }

    fn validate(&self, ctx: &CheckContext, report: &mut ValidationReport) {
        let dir = ctx.config.get_or(&[keys::HOME_DIRECTORY], "");
        check_writable_directory(self.title(), &dir, ctx, report);
    }
}

/// Service-script installation needs a known init.d-style distribution.
pub struct OsSupportCheck;

impl ValidationCheck for OsSupportCheck {
    fn title(&self) -> &'static str {
        "Operating system support"
    }

    fn validate(&self, ctx: &CheckContext, report: &mut ValidationReport) {
        let uname = ctx.shell("uname -s").map(|o| o.stdout).unwrap_or_default();
        if uname == "Linux" {
            report.info(self.title(), "Linux host detected");
            return;
        }
        let wants_services = ctx.config.get(&[keys::SVC_INSTALL]) == Some("true");
        let message = format!(
            "'{}' is not a supported distribution for service script installation",
            if uname.is_empty() { "unknown" } else { &uname }
        );
        if wants_services {
            report.error(self.title(), message);
        } else {
            report.warn(self.title(), message);
        }
    }
}
