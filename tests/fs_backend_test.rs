use anony::error::BoardError;
use anony::store::fs::FsBackend;
use anony::store::KeyValueStore;
use std::fs;
use tempfile::TempDir;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().join("data"));
    (dir, backend)
}

#[test]
fn test_fs_backend_basic_io() {
    let (_dir, backend) = setup();

    assert_eq!(backend.get("k").unwrap(), None);

    backend.set("k", "v1").unwrap();
    assert_eq!(backend.get("k").unwrap(), Some("v1".to_string()));

    backend.set("k", "v2").unwrap();
    backend.set("other", "x").unwrap();
    assert_eq!(backend.get("k").unwrap(), Some("v2".to_string()));
    assert_eq!(backend.get("other").unwrap(), Some("x".to_string()));
}

#[test]
fn test_fs_backend_atomic_write_artifacts() {
    let (_dir, backend) = setup();
    backend.set("k", "Atomic").unwrap();

    assert!(backend.storage_path().exists());

    let entries = fs::read_dir(backend.root()).unwrap();
    for entry in entries {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
    }
}

#[test]
fn test_fs_backend_visible_to_second_handle() {
    let (dir, backend) = setup();
    backend.set("shared", "yes").unwrap();

    let other = FsBackend::new(dir.path().join("data"));
    assert_eq!(other.get("shared").unwrap(), Some("yes".to_string()));
}

#[test]
fn test_fs_backend_malformed_file_is_an_error() {
    let (_dir, backend) = setup();
    fs::create_dir_all(backend.root()).unwrap();
    fs::write(backend.storage_path(), "[1, 2").unwrap();

    assert!(matches!(backend.get("k"), Err(BoardError::Serialization(_))));
}

#[test]
fn test_fs_backend_write_replaces_malformed_file() {
    let (_dir, backend) = setup();
    fs::create_dir_all(backend.root()).unwrap();
    fs::write(backend.storage_path(), "{ truncated").unwrap();

    backend.set("k", "v").unwrap();
    assert_eq!(backend.get("k").unwrap(), Some("v".to_string()));

    let aside: Vec<_> = fs::read_dir(backend.root())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".corrupt"))
        .collect();
    assert_eq!(aside.len(), 1);
    let kept = fs::read_to_string(backend.root().join(&aside[0])).unwrap();
    assert_eq!(kept, "{ truncated");
}
