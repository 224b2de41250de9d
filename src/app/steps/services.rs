use crate::app::steps::{DeployContext, DeploymentStep};
use crate::domain::keys;
use crate::domain::{AppError, DeploymentMethod, FINAL_STEP_WEIGHT};

/// Finishing step: install init-system registrations for every service the
/// earlier steps registered, then start them. Runs at the final weight so
/// every component has had its chance to register.
pub struct ServicesSteps;

impl DeploymentStep for ServicesSteps {
    fn name(&self) -> &'static str {
        "services"
    }

    fn methods(&self) -> Vec<DeploymentMethod> {
        vec![DeploymentMethod::weighted("apply_services", FINAL_STEP_WEIGHT)]
    }

    fn run(&self, method: &str, ctx: &mut DeployContext) -> Result<(), AppError> {
        if method != "apply_services" {
            return Err(AppError::step(method, "unknown services method"));
        }

        let install = ctx.config.get(&[keys::SVC_INSTALL]) == Some("true");
        let start = ctx.config.get(&[keys::SVC_START]) == Some("true");
        let sudo = {
            let prefix = ctx.config.get_or(&[keys::ROOT_PREFIX], "");
            prefix == "true" || prefix == "sudo"
        };

        // Start order is registration order.
        for script in ctx.services().to_vec() {
            let script_str = script.display().to_string();
            let name = script
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("service")
                .to_string();

            if install {
                let target = format!("/etc/init.d/{}", name);
                if sudo {
                    ctx.runner.run("sudo", &["cp", &script_str, &target])?;
                } else {
                    ctx.runner.run("cp", &[&script_str, &target])?;
                }
                ctx.out.info(&format!("INSTALLED SERVICE: {}", target));
            }
            if start {
                if sudo {
                    ctx.runner.run("sudo", &[&script_str, "start"])?;
                } else {
                    ctx.runner.run(&script_str, &["start"])?;
                }
                ctx.out.info(&format!("STARTED SERVICE: {}", name));
            }
        }
        Ok(())
    }
}

/// Stop every registered service in the exact reverse of registration order.
pub fn stop_services(ctx: &DeployContext) -> Result<(), AppError> {
    for script in ctx.services().iter().rev() {
        let script_str = script.display().to_string();
        ctx.runner.run(&script_str, &["stop"])?;
        ctx.out.info(&format!("STOPPED SERVICE: {}", script_str));
    }
    Ok(())
}
