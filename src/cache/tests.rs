use super::*;
use crate::storage::{FileStore, MemoryStore};
use tempfile::TempDir;

/// A store whose every operation fails.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> anyhow::Result<Option<String>> {
        Err(anyhow::anyhow!("disk on fire"))
    }

    fn set(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("disk on fire"))
    }

    fn remove(&self, _key: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("disk on fire"))
    }
}

fn memory_cache() -> (PosterCache, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (PosterCache::new(store.clone()), store)
}

#[test]
fn test_get_missing_is_none() {
    let (cache, _) = memory_cache();
    assert!(cache.get("Dark").is_none());
    assert!(cache.is_empty());
}

#[test]
fn test_first_write_wins() {
    let (cache, _) = memory_cache();
    assert!(cache.put("A", "u1"));
    assert!(!cache.put("A", "u2"));
    assert_eq!(cache.get("A").as_deref(), Some("u1"));
}

#[test]
fn test_put_persists_json_map() {
    let (cache, store) = memory_cache();
    cache.put("Severance", "http://img/sev.jpg");
    let raw = store.get(POSTER_CACHE_KEY).unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["Severance"], "http://img/sev.jpg");
}

#[test]
fn test_put_ignores_empty_values() {
    let (cache, store) = memory_cache();
    assert!(!cache.put("", "http://img/x.jpg"));
    assert!(!cache.put("Title", ""));
    assert!(cache.is_empty());
    assert!(store.get(POSTER_CACHE_KEY).unwrap().is_none());
}

#[test]
fn test_bulk_ingest_skips_incomplete_entries() {
    let (cache, _) = memory_cache();
    let added = cache.bulk_ingest([
        ("A", Some("http://img/a.jpg")),
        ("B", None),
        ("", Some("http://img/orphan.jpg")),
        ("C", Some("")),
        ("D", Some("http://img/d.jpg")),
    ]);
    assert_eq!(added, 2);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("A").as_deref(), Some("http://img/a.jpg"));
    assert!(cache.get("B").is_none());
    assert!(cache.get("C").is_none());
}

#[test]
fn test_bulk_ingest_keeps_existing_entries() {
    let (cache, _) = memory_cache();
    cache.put("A", "first");
    let added = cache.bulk_ingest([("A", Some("second")), ("A", Some("third"))]);
    assert_eq!(added, 0);
    assert_eq!(cache.get("A").as_deref(), Some("first"));
}

#[test]
fn test_reload_from_store() {
    let temp = TempDir::new().unwrap();
    {
        let store = Arc::new(FileStore::new(temp.path()).unwrap());
        let cache = PosterCache::new(store);
        cache.put("The Bear", "http://img/bear.jpg");
    }
    let store = Arc::new(FileStore::new(temp.path()).unwrap());
    let cache = PosterCache::new(store);
    assert_eq!(cache.get("The Bear").as_deref(), Some("http://img/bear.jpg"));
}

#[test]
fn test_corrupt_store_loads_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set(POSTER_CACHE_KEY, "{definitely not json").unwrap();
    let cache = PosterCache::new(store.clone());
    assert!(cache.is_empty());

    // A fresh write replaces the corrupt blob
    cache.put("A", "u");
    let raw = store.get(POSTER_CACHE_KEY).unwrap().unwrap();
    assert_eq!(raw, r#"{"A":"u"}"#);
}

#[test]
fn test_non_object_store_loads_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set(POSTER_CACHE_KEY, r#"["A","B"]"#).unwrap();
    assert!(PosterCache::new(store).is_empty());
}

#[test]
fn test_non_string_values_are_skipped() {
    let store = Arc::new(MemoryStore::new());
    store
        .set(POSTER_CACHE_KEY, r#"{"A":"u","B":42,"C":null,"D":""}"#)
        .unwrap();
    let cache = PosterCache::new(store);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("A").as_deref(), Some("u"));
}

#[test]
fn test_broken_store_degrades_to_memory_only() {
    let cache = PosterCache::new(Arc::new(BrokenStore));
    assert!(cache.is_empty());
    assert!(cache.put("A", "u"));
    assert_eq!(cache.get("A").as_deref(), Some("u"));
}

#[test]
fn test_two_handles_do_not_drop_each_others_entries() {
    let store = Arc::new(MemoryStore::new());
    let first = PosterCache::new(store.clone());
    let second = PosterCache::new(store.clone());

    assert!(first.put("X", "ux"));
    assert!(second.put("Y", "uy"));

    let reloaded = PosterCache::new(store);
    assert_eq!(reloaded.get("X").as_deref(), Some("ux"));
    assert_eq!(reloaded.get("Y").as_deref(), Some("uy"));
    assert_eq!(second.get("X").as_deref(), Some("ux"));
}

#[test]
fn test_stored_entry_from_other_handle_wins() {
    let store = Arc::new(MemoryStore::new());
    let first = PosterCache::new(store.clone());
    let second = PosterCache::new(store.clone());

    assert!(first.put("A", "from-first"));
    assert!(!second.put("A", "from-second"));
    assert_eq!(second.get("A").as_deref(), Some("from-first"));

    let reloaded = PosterCache::new(store);
    assert_eq!(reloaded.get("A").as_deref(), Some("from-first"));
}
