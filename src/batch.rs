//! Batch validation over files and directories.
//!
//! Each file is validated on its own; a failing file never stops the rest of
//! the batch from being checked.

use crate::error::TestPlanError;
use crate::testplan::TestPlan;
use crate::validate::validate_file;
use glob::{Pattern, glob};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extensions recognised when expanding a directory.
pub const PLAN_EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Expand directories into the plan files beneath them.
///
/// Directories are searched recursively for every [`PLAN_EXTENSIONS`] file.
/// Other paths are kept as given, even when they do not exist, so that a
/// missing file is reported rather than silently dropped. The result is sorted
/// and free of duplicates.
pub fn resolve_validation_paths(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut resolved = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let before = resolved.len();
            resolved.extend(find_plan_files(input));
            debug!(
                directory = %input.display(),
                found = resolved.len() - before,
                "expanded directory"
            );
        } else {
            resolved.push(input.clone());
        }
    }
    resolved.sort();
    resolved.dedup();
    resolved
}

fn find_plan_files(dir: &Path) -> Vec<PathBuf> {
    let base = Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();
    for ext in PLAN_EXTENSIONS {
        let pattern = format!("{}/**/*.{}", base.trim_end_matches('/'), ext);
        match glob(&pattern) {
            Ok(paths) => files.extend(paths.filter_map(Result::ok).filter(|p| p.is_file())),
            Err(e) => warn!(pattern = %pattern, error = %e, "invalid directory pattern"),
        }
    }
    files
}

/// Outcome of validating one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Result<TestPlan, TestPlanError>,
}

impl FileReport {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Union of every per-file outcome of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of input paths given, before directory expansion.
    pub inputs: usize,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn passed(&self) -> usize {
        self.files.iter().filter(|f| f.is_valid()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.passed()
    }

    /// True when inputs were given but none resolved to a plan file.
    pub fn is_empty_selection(&self) -> bool {
        self.inputs > 0 && self.files.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && !self.is_empty_selection()
    }

    /// Process exit status for the batch: `0` on success, `1` otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }
}

/// Resolve `inputs` and validate every resulting file, in sorted order.
pub fn validate_paths(inputs: &[PathBuf]) -> BatchReport {
    let paths = resolve_validation_paths(inputs);
    info!(inputs = inputs.len(), files = paths.len(), "validating test plans");

    let files: Vec<FileReport> = paths
        .into_iter()
        .map(|path| {
            let outcome = validate_file(&path);
            if let Err(e) = &outcome {
                warn!(path = %path.display(), error = %e, "test plan failed validation");
            }
            FileReport { path, outcome }
        })
        .collect();

    let report = BatchReport {
        inputs: inputs.len(),
        files,
    };
    info!(
        passed = report.passed(),
        failed = report.failed(),
        "test plan validation finished"
    );
    report
}
