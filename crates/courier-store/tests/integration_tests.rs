//! Integration tests for courier-store
//!
//! These tests exercise the record store against the file backend,
//! including restarts and damaged slot files.

use chrono::Utc;
use courier_domain::{DurableSlot, Fields, OriginAddress, Record, RecordCollection, RecordId};
use courier_store::{FileSlot, RecordStore, StoreConfig, StoreError};
use std::fs;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

const KEY: &str = "courier_records";

fn record(event: &str) -> Record {
    let mut fields = Fields::new();
    fields.insert("event".to_string(), event.to_string());
    fields.insert("plan".to_string(), String::new());
    Record::new(RecordId::new(), Utc::now(), fields, "integration".to_string())
}

fn parsed_slot(dir: &TempDir) -> RecordCollection {
    let raw = fs::read_to_string(dir.path().join(format!("{}.json", KEY))).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn test_records_survive_restart() {
    let dir = TempDir::new().unwrap();

    let first = record("signup");
    let second = record("upgrade");
    {
        let mut store = RecordStore::open(FileSlot::new(dir.path()), KEY);
        store.append(first.clone());
        store.append(second.clone());
    }

    let store = RecordStore::open(FileSlot::new(dir.path()), KEY);
    let ids: Vec<_> = store.records().iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec![first.id.clone(), second.id.clone()]);
    assert_eq!(store.records().as_slice()[0], first);
}

#[test]
fn test_each_append_grows_slot_by_one() {
    let dir = TempDir::new().unwrap();
    let mut store = RecordStore::open(FileSlot::new(dir.path()), KEY);

    for expected in 1..=5 {
        store.append(record("tick"));
        assert_eq!(parsed_slot(&dir).len(), expected);
    }
}

#[test]
fn test_truncated_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = RecordStore::open(FileSlot::new(dir.path()), KEY);
        store.append(record("signup"));
    }

    // Simulate a damaged slot
    let path = dir.path().join(format!("{}.json", KEY));
    let raw = fs::read_to_string(&path).unwrap();
    fs::write(&path, &raw[..raw.len() / 2]).unwrap();

    let store = RecordStore::open(FileSlot::new(dir.path()), KEY);
    assert!(store.records().is_empty());
    assert_err!(store.try_load());
}

#[test]
fn test_origin_update_persists() {
    let dir = TempDir::new().unwrap();
    let r = record("signup");
    let id = r.id.clone();
    {
        let mut store = RecordStore::open(FileSlot::new(dir.path()), KEY);
        store.append(r);
        assert!(store.set_origin(&id, OriginAddress::Unknown));
    }

    let collection = parsed_slot(&dir);
    assert_eq!(collection.get(&id).unwrap().origin_address, OriginAddress::Unknown);
}

#[test]
fn test_quota_exceeded_keeps_last_good_slot() {
    let dir = TempDir::new().unwrap();
    let mut store = RecordStore::open(FileSlot::new(dir.path()).with_quota(400), KEY);

    store.append(record("one"));
    assert_eq!(parsed_slot(&dir).len(), 1);

    // Keep appending until the serialized collection no longer fits
    for _ in 0..10 {
        store.append(record("many"));
    }
    assert_eq!(store.records().len(), 11);
    let on_disk = parsed_slot(&dir).len();
    assert!(on_disk >= 1 && on_disk < 11, "slot should hold the last write that fit");
}

#[test]
fn test_clear_then_reopen_is_empty() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = RecordStore::open(FileSlot::new(dir.path()), KEY);
        store.append(record("a"));
        store.clear();
    }

    let mut store = RecordStore::open(FileSlot::new(dir.path()), KEY);
    assert!(store.load().is_empty());
}

#[test]
fn test_config_opens_file_store() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig {
        dir: dir.path().to_path_buf(),
        ..StoreConfig::default()
    };

    let mut store = assert_ok!(config.open());
    store.append(record("configured"));
    assert_eq!(parsed_slot(&dir).len(), 1);
}

#[test]
fn test_slot_rejects_bad_key() {
    let dir = TempDir::new().unwrap();
    let mut slot = FileSlot::new(dir.path());
    let result = slot.write("a/b", "[]");
    assert!(matches!(result, Err(StoreError::InvalidKey(_))));
}
