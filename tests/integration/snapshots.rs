//! Snapshot integration tests
//!
//! A snapshot written to disk and read back checks the same as the original.

use std::path::PathBuf;

use bindcheck::foundation::ErrorKind;
use bindcheck::runtime::{Driver, load_from_file, save_to_file};

use crate::program::snapshot;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("bindcheck_{}_{name}", std::process::id()))
}

fn messages_after_reload(name: &str) -> (Vec<String>, Vec<String>) {
    let original = snapshot();
    let path = temp_path(name);
    save_to_file(&original, &path).unwrap();
    let restored = load_from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(restored, original);
    let driver = Driver::default();
    let before = driver.run(&original).unwrap();
    let after = driver.run(&restored).unwrap();
    let render = |d: &bindcheck::foundation::Diagnostic| d.to_string();
    (
        before.diagnostics.iter().map(render).collect(),
        after.diagnostics.iter().map(render).collect(),
    )
}

#[test]
fn json_snapshot_checks_the_same() {
    let (before, after) = messages_after_reload("roundtrip.json");
    assert_eq!(before.len(), 1);
    assert_eq!(before, after);
}

#[test]
fn msgpack_snapshot_checks_the_same() {
    let (before, after) = messages_after_reload("roundtrip.msgpack");
    assert_eq!(before.len(), 1);
    assert_eq!(before, after);
}

#[test]
fn corrupt_file_reports_its_path() {
    let path = temp_path("corrupt.json");
    std::fs::write(&path, b"{ not json").unwrap();
    let err = load_from_file(&path).unwrap_err();
    let _ = std::fs::remove_file(&path);

    assert!(matches!(err.kind, ErrorKind::Snapshot(_)));
    let source = err.context.and_then(|c| c.source).unwrap();
    assert!(source.ends_with("corrupt.json"));
}
