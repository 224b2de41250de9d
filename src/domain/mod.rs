pub mod deployment;
pub mod error;
pub mod keys;
pub mod prompt;
pub mod properties;
pub mod report;
pub mod validators;

pub use deployment::{DbmsType, DeploymentMethod, FINAL_STEP_WEIGHT, PackageKind, ServiceAction};
pub use error::AppError;
pub use prompt::{Disabled, PromptDescriptor, PromptReply};
pub use properties::{PropertyStore, PropertyValue};
pub use report::{ReportEntry, Severity, ValidationReport};
pub use validators::{ValidationFailure, Validator};
