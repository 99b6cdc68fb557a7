//! Test plan validation entry points.
//!
//! Every entry point builds a fresh [`TestPlan`] and returns it on success.
//! On failure the caller gets **all** structural errors of the document at
//! once, not just the first.

use crate::error::{TestPlanError, ValidationFailure};
use crate::parse::parse_document;
use crate::schema::Schema;
use crate::testplan::TestPlan;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Validate an in-memory document against the test plan schema.
pub fn validate_data(data: &Value) -> Result<TestPlan, ValidationFailure> {
    let mut errors = Vec::new();
    let plan = TestPlan::validate(data, "", &mut errors);
    debug!(errors = errors.len(), "validated test plan data");
    match plan {
        Some(plan) if errors.is_empty() => Ok(plan),
        _ => Err(ValidationFailure { errors }),
    }
}

/// Parse YAML or JSON text and validate it.
pub fn validate_str(input: &str) -> Result<TestPlan, TestPlanError> {
    let data = parse_document(input)?;
    Ok(validate_data(&data)?)
}

/// Read, parse and validate a test plan file.
///
/// The file is read in full and closed before parsing starts. A missing file
/// surfaces as [`TestPlanError::Io`] with [`std::io::ErrorKind::NotFound`].
pub fn validate_file(path: impl AsRef<Path>) -> Result<TestPlan, TestPlanError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading test plan");
    let input = fs::read_to_string(path).map_err(|source| TestPlanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    validate_str(&input)
}
