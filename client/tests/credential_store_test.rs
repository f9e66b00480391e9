//! File-backed credential store tests.

use nw_dashboard::credential::{CredentialStore, FileStore};

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path().join("neswara"));

    assert_eq!(store.load().unwrap(), None);
    store.save("abc.def.ghi").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("abc.def.ghi"));

    // A second handle on the same directory sees the saved token.
    let reopened = FileStore::new(dir.path().join("neswara"));
    assert_eq!(reopened.load().unwrap().as_deref(), Some("abc.def.ghi"));

    store.clear().unwrap();
    assert_eq!(reopened.load().unwrap(), None);
    assert!(!store.path().exists());
}

#[test]
fn test_clear_without_file_is_ok() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path());
    store.clear().expect("clearing nothing should succeed");
}

#[test]
fn test_corrupt_file_reads_as_empty() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FileStore::new(dir.path());
    std::fs::write(store.path(), "{not json").unwrap();

    assert_eq!(store.load().unwrap(), None);

    store.save("fresh").unwrap();
    assert_eq!(store.load().unwrap().as_deref(), Some("fresh"));
}
