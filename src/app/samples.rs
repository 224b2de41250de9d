use std::fs;
use std::path::Path;

use include_dir::{Dir, include_dir};

use crate::domain::AppError;

static SAMPLES_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/samples");

pub fn sample_content(name: &str) -> Option<&'static str> {
    SAMPLES_DIR.get_file(name).and_then(|file| file.contents_utf8())
}

/// Write one embedded sample to disk.
pub fn materialize(name: &str, destination: &Path) -> Result<(), AppError> {
    let content = sample_content(name).ok_or_else(|| AppError::StepFailed {
        step: "deploy_config_files".to_string(),
        details: format!("embedded sample '{}' is missing", name),
    })?;
    fs::write(destination, content)?;
    Ok(())
}
