use std::path::PathBuf;

use crate::app::AppContext;
use crate::app::commands::{fail_on_errors, preflight};
use crate::app::prompts::registry_for;
use crate::domain::{AppError, PackageKind, PropertyStore, ValidationReport};
use crate::ports::{CommandRunner, PromptIo, RemoteShell};

pub struct ValidateOptions {
    pub config: PathBuf,
}

/// Re-run configuration consistency and host pre-flight checks against a
/// saved configuration, without deploying anything.
pub fn execute<R, S, P>(
    ctx: &mut AppContext<R, S, P>,
    options: &ValidateOptions,
) -> Result<(), AppError>
where
    R: CommandRunner,
    S: RemoteShell,
    P: PromptIo,
{
    if !options.config.exists() {
        return Err(AppError::ConfigNotFound(options.config.display().to_string()));
    }
    let mut store = PropertyStore::load(&options.config)?;

    let pipeline = registry_for(&store, PackageKind::ValidateOnly);
    let mut report = ValidationReport::new();
    pipeline.run_batch(&mut store, &mut report);
    pipeline.verify_no_unknown_keys(&store, &mut report);

    report.extend(preflight(ctx, &store));
    fail_on_errors(&ctx.out, &report)?;
    ctx.out.info("Configuration is valid");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::output::Output;
    use crate::domain::keys;
    use crate::testing::{MockRemote, MockRunner, ScriptedPrompt};
    use tempfile::tempdir;

    #[test]
    fn missing_config_is_reported_as_such() {
        let mut ctx = AppContext::new(
            MockRunner::new(),
            MockRemote::new(),
            ScriptedPrompt::new(Vec::<String>::new()),
            Output::new(false, true),
            "localhost".to_string(),
        );
        let options = ValidateOptions { config: PathBuf::from("/nonexistent/clusterkit.cfg") };
        let err = execute(&mut ctx, &options).unwrap_err();
        assert!(matches!(err, AppError::ConfigNotFound(_)));
    }

    #[test]
    fn failing_remote_login_fails_validation() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("clusterkit.cfg");
        let mut store = PropertyStore::new();
        store.set(&[keys::HOST], "db2.example.com");
        store.set(&[keys::USERID], "tungsten");
        store.set(&[keys::HOME_DIRECTORY], "/opt/ck");
        store.set(&[keys::REPL_ROLE], "master");
        store.store(&config).unwrap();

        let remote = MockRemote::new().fail_host("db2.example.com");
        let mut ctx = AppContext::new(
            MockRunner::new(),
            remote,
            ScriptedPrompt::new(Vec::<String>::new()),
            Output::new(false, true),
            "control".to_string(),
        );
        let options = ValidateOptions { config };
        let err = execute(&mut ctx, &options).unwrap_err();
        assert!(matches!(err, AppError::ReportedErrors(_)));
    }
}
