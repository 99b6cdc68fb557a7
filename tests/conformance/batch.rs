use super::common::*;
use std::path::PathBuf;
use tempfile::TempDir;
use ychaos::batch::{resolve_validation_paths, validate_paths};

const SELF_PLAN: &str = "attack:\n  target_type: self\n  agents:\n    - type: no_op\n";
const BROKEN_PLAN: &str = "attack:\n  target_type: self\n  agents: []\n";

#[test]
fn one_bad_file_does_not_stop_the_batch() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_file(dir.path(), "a.yaml", SELF_PLAN),
        write_file(dir.path(), "b.yaml", BROKEN_PLAN),
        write_file(dir.path(), "c.json", VALID_PLAN),
    ];

    let report = validate_paths(&inputs);
    assert_eq!(report.files.len(), 3);
    assert_eq!(report.passed(), 2);
    assert_eq!(report.failed(), 1);
    assert!(!report.is_success());
    assert_eq!(report.exit_code(), 1);

    let failed: Vec<&PathBuf> = report.files.iter().filter(|f| !f.is_valid()).map(|f| &f.path).collect();
    assert_eq!(failed, vec![&inputs[1]]);
}

#[test]
fn all_valid_files_succeed() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_file(dir.path(), "one.yml", SELF_PLAN),
        write_file(dir.path(), "two.yaml", VALID_PLAN),
    ];
    let report = validate_paths(&inputs);
    assert!(report.is_success());
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn directories_expand_recursively_by_extension() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "a.yaml", SELF_PLAN);
    write_file(dir.path(), "nested/b.yml", SELF_PLAN);
    write_file(dir.path(), "nested/deeper/c.json", SELF_PLAN);
    write_file(dir.path(), "notes.txt", "not a plan");
    write_file(dir.path(), "nested/README.md", "# plans");

    let resolved = resolve_validation_paths(&[dir.path().to_path_buf()]);
    let expected = vec![
        dir.path().join("a.yaml"),
        dir.path().join("nested/b.yml"),
        dir.path().join("nested/deeper/c.json"),
    ];
    assert_eq!(resolved, expected);

    let report = validate_paths(&[dir.path().to_path_buf()]);
    assert_eq!(report.passed(), 3);
    assert!(report.is_success());
}

#[test]
fn files_are_sorted_and_deduplicated() {
    let dir = TempDir::new().unwrap();
    let b = write_file(dir.path(), "b.yaml", SELF_PLAN);
    let a = write_file(dir.path(), "a.yaml", SELF_PLAN);

    let resolved = resolve_validation_paths(&[b.clone(), a.clone(), dir.path().to_path_buf()]);
    assert_eq!(resolved, vec![a, b]);
}

#[test]
fn directory_without_plans_fails() {
    let dir = TempDir::new().unwrap();
    write_file(dir.path(), "notes.txt", "nothing here");

    let report = validate_paths(&[dir.path().to_path_buf()]);
    assert!(report.files.is_empty());
    assert!(report.is_empty_selection());
    assert!(!report.is_success());
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn missing_file_is_reported_not_dropped() {
    let dir = TempDir::new().unwrap();
    let good = write_file(dir.path(), "good.yaml", SELF_PLAN);
    let missing = dir.path().join("missing.yaml");

    let report = validate_paths(&[good, missing.clone()]);
    assert_eq!(report.files.len(), 2);
    assert_eq!(report.failed(), 1);

    let entry = report.files.iter().find(|f| f.path == missing).unwrap();
    match &entry.outcome {
        Err(e) => assert!(e.is_not_found()),
        Ok(_) => panic!("missing file must not validate"),
    }
}

#[test]
fn parse_errors_are_reported_per_file() {
    let dir = TempDir::new().unwrap();
    let inputs = vec![
        write_file(dir.path(), "empty.yaml", ""),
        write_file(dir.path(), "ok.yaml", SELF_PLAN),
    ];
    let report = validate_paths(&inputs);
    assert_eq!(report.passed(), 1);
    assert_eq!(report.failed(), 1);
}
