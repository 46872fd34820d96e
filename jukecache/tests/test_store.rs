use jukecache::Store;
use std::path::PathBuf;
use std::time::Duration;

fn entry_path(name: &str) -> PathBuf {
    PathBuf::from(format!("/tmp/{}.m4a", name))
}

#[tokio::test]
async fn test_insert_and_get() {
    let store = Store::new();

    store.insert("a", entry_path("a"), 42);

    let entry = store.get("a").unwrap();
    assert_eq!(entry.size, 42);
    assert_eq!(entry.hits, 0);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_touch_updates_stats() {
    let store = Store::new();
    store.insert("a", entry_path("a"), 42);

    let before = store.get("a").unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let touched = store.touch("a").unwrap();
    assert_eq!(touched.hits, 1);
    assert!(touched.last_access > before.last_access);

    // Une clé inconnue ne crée rien
    assert!(store.touch("missing").is_none());
}

#[tokio::test]
async fn test_evict_to_limit_removes_least_recently_used() {
    let store = Store::new();

    for name in ["a", "b", "c"] {
        store.insert(name, entry_path(name), 1);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    // "a" redevient la plus récente
    store.touch("a");

    let victims = store.evict_to_limit(2);

    assert_eq!(victims.len(), 1);
    assert_eq!(victims[0].0, "b");
    assert_eq!(store.len(), 2);
    assert!(store.get("a").is_some());
    assert!(store.get("c").is_some());
}

#[tokio::test]
async fn test_evict_to_limit_is_noop_under_limit() {
    let store = Store::new();
    store.insert("a", entry_path("a"), 1);

    assert!(store.evict_to_limit(5).is_empty());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_remove_and_drain() {
    let store = Store::new();
    store.insert("a", entry_path("a"), 1);
    store.insert("b", entry_path("b"), 2);

    let removed = store.remove("a").unwrap();
    assert_eq!(removed.size, 1);
    assert!(store.remove("a").is_none());

    let drained = store.drain();
    assert_eq!(drained.len(), 1);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_snapshot_sorted_by_hits() {
    let store = Store::new();
    store.insert("cold", entry_path("cold"), 1);
    store.insert("hot", entry_path("hot"), 1);

    store.touch("hot");
    store.touch("hot");
    store.touch("cold");

    let snapshot = store.snapshot();
    assert_eq!(snapshot[0].0, "hot");
    assert_eq!(snapshot[1].0, "cold");
}
