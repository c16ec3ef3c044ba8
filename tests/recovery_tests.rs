//! Recovery Tests
//!
//! Restart scenarios driven through the public store and log API.

use std::fs;
use std::sync::Arc;
use std::thread;

use tempfile::TempDir;
use walcache::eviction::create_eviction_policy;
use walcache::{CacheError, CacheStore, WalRecord, WriteAheadLog};

fn reopen(dir: &TempDir, capacity: usize) -> CacheStore {
    let log = WriteAheadLog::open(dir.path().join("wal.log")).unwrap();
    CacheStore::new(capacity, log).unwrap()
}

#[test]
fn test_round_trip_without_new_writes() {
    let dir = TempDir::new().unwrap();

    let store = reopen(&dir, 8);
    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    store.close().unwrap();
    drop(store);

    let store = reopen(&dir, 8);
    assert_eq!(store.get("a"), Some("1".to_string()));
    assert_eq!(store.get("b"), Some("2".to_string()));
}

#[test]
fn test_oversized_log_keeps_most_recent_keys() {
    let dir = TempDir::new().unwrap();
    {
        let mut log = WriteAheadLog::open(dir.path().join("wal.log")).unwrap();
        for i in 0..50 {
            log.append(&WalRecord::new(format!("key{i}"), format!("{i}")))
                .unwrap();
        }
        log.close().unwrap();
    }

    let store = reopen(&dir, 5);
    assert_eq!(store.len(), 5);
    for i in 45..50 {
        assert_eq!(store.get(&format!("key{i}")), Some(format!("{i}")));
    }
    assert_eq!(store.get("key44"), None);
}

#[test]
fn test_recovery_after_crash_mid_append() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wal.log");
    {
        let store = reopen(&dir, 8);
        store.set("durable", "yes").unwrap();
    }
    // Simulate a torn write at the tail
    let mut contents = fs::read(&path).unwrap();
    contents.extend_from_slice(b"half\twrit");
    fs::write(&path, contents).unwrap();

    let store = reopen(&dir, 8);
    assert_eq!(store.get("durable"), Some("yes".to_string()));
    assert_eq!(store.get("half"), None);

    store.set("after", "crash").unwrap();
    drop(store);

    let store = reopen(&dir, 8);
    assert_eq!(store.get("after"), Some("crash".to_string()));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_legacy_log_lines_replay() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("wal.log"),
        "user:1\t{\"name\":\"a\"}\nnote\tfirst\\nsecond\nno-delimiter\n",
    )
    .unwrap();

    let store = reopen(&dir, 8);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("note"), Some("first\nsecond".to_string()));
    assert_eq!(store.get("user:1"), Some("{\"name\":\"a\"}".to_string()));
}

#[test]
fn test_failed_set_is_not_visible_after_restart() {
    let dir = TempDir::new().unwrap();
    {
        let store = reopen(&dir, 8);
        store.set("kept", "1").unwrap();
        store.close().unwrap();
        assert!(matches!(store.set("lost", "2"), Err(CacheError::LogClosed(_))));
        assert_eq!(store.get("lost"), None);
    }

    let store = reopen(&dir, 8);
    assert_eq!(store.get("kept"), Some("1".to_string()));
    assert_eq!(store.get("lost"), None);
}

#[test]
fn test_concurrent_writers_all_logged() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(reopen(&dir, 1_000));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50 {
                    store.set(format!("t{t}-{i}"), format!("{i}")).unwrap();
                    assert_eq!(store.get(&format!("t{t}-{i}")), Some(format!("{i}")));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.len(), 400);
    store.close().unwrap();

    let log = WriteAheadLog::open(dir.path().join("wal.log")).unwrap();
    assert_eq!(log.read_all().unwrap().len(), 400);

    let recovered = reopen(&dir, 1_000);
    assert_eq!(recovered.len(), 400);
}

#[test]
fn test_lfu_store_recovers_with_capacity_bound() {
    let dir = TempDir::new().unwrap();
    {
        let store = reopen(&dir, 100);
        for i in 0..20 {
            store.set(format!("k{i}"), "v").unwrap();
        }
    }

    let log = WriteAheadLog::open(dir.path().join("wal.log")).unwrap();
    let policy = create_eviction_policy("lfu", 4).unwrap();
    let store = CacheStore::with_policy(policy, log).unwrap();

    assert_eq!(store.len(), 4);
    assert_eq!(store.policy_name(), "lfu");
}
