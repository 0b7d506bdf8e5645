//! Integration tests for knowlift-store
//!
//! These tests verify how the database file is created, reopened and checked.

use knowlift_store::{SqliteStore, StoreError};

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
    assert!(store.unwrap().ping().is_ok());
}

#[test]
fn test_store_reopens_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("knowlift.db");

    SqliteStore::new(&path).unwrap();
    assert!(path.exists());

    let store = SqliteStore::new(&path).unwrap();
    store.ping().unwrap();
}

#[test]
fn test_open_existing_does_not_create() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("knowlift.db");

    let result = SqliteStore::open_existing(&path);
    assert!(matches!(result, Err(StoreError::Database(_))));
    assert!(!path.exists(), "Opening an existing database must not create it");
}

#[test]
fn test_open_existing_initialized_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("knowlift.db");
    SqliteStore::new(&path).unwrap();

    let store = SqliteStore::open_existing(&path).unwrap();
    store.ping().unwrap();
}

#[test]
fn test_open_existing_empty_file_fails_ping() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("knowlift.db");
    std::fs::write(&path, b"").unwrap();

    let store = SqliteStore::open_existing(&path).unwrap();
    assert!(matches!(store.ping(), Err(StoreError::MissingSchema(_))));
}
