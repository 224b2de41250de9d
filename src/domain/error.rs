use std::io;

use thiserror::Error;

use crate::domain::validators::ValidationFailure;

/// Library-wide error type for clusterkit operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A property line in a configuration file could not be parsed.
    #[error("Malformed property line in {path}: '{line}'")]
    MalformedProperties { path: String, line: String },

    /// A prompt or batch value failed its validation rule.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// An invoked external command returned non-zero.
    #[error("Command failed: `{command}`: {details}")]
    CommandFailed { command: String, details: String },

    /// An SSH invocation against a remote host failed.
    #[error("SSH to {host} failed: {details}")]
    SshFailed { host: String, details: String },

    /// Template source file could not be read.
    #[error("Template not readable: {0}")]
    TemplateNotReadable(String),

    /// Configuration file required by the command was not found.
    #[error("Configuration not found: {0}. Run 'clusterkit install' first.")]
    ConfigNotFound(String),

    /// Replication service already defined.
    #[error("Replication service '{0}' already exists")]
    ServiceExists(String),

    /// Replication service missing from the configuration.
    #[error("Replication service '{0}' is not defined")]
    ServiceNotFound(String),

    /// The service command needs exactly one of --create, --delete, --update.
    #[error("Specify exactly one of --create, --delete or --update")]
    ServiceAction,

    /// Pre-flight validation or batch prompting ended with collected errors.
    #[error("{0} error(s) found, see the report above")]
    ReportedErrors(usize),

    /// A deployment step failed; remaining steps for the host were skipped.
    #[error("Deployment step '{step}' failed: {details}")]
    StepFailed { step: String, details: String },

    /// The user interrupted an interactive prompt.
    #[error("Configuration interrupted")]
    Interrupted,

    /// Prompt console failure outside of user interruption.
    #[error("Prompt failed: {0}")]
    PromptIo(String),
}

impl AppError {
    pub fn step(step: &str, err: impl std::fmt::Display) -> Self {
        AppError::StepFailed { step: step.to_string(), details: err.to_string() }
    }
}
