//! Durable title -> poster URL memo.
//!
//! Entries are append-only: the first poster seen for a title is kept for good.
//! Storage problems downgrade the cache to empty/no-op and are only logged.

use crate::storage::{KeyValueStore, POSTER_CACHE_KEY};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

pub struct PosterCache {
    store: Arc<dyn KeyValueStore>,
    entries: Mutex<BTreeMap<String, String>>,
}

impl PosterCache {
    /// Load the persisted map. Missing or corrupt data loads as empty.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = load_entries(store.as_ref());
        debug!("poster cache loaded with {} entries", entries.len());
        Self {
            store,
            entries: Mutex::new(entries),
        }
    }

    pub fn get(&self, title: &str) -> Option<String> {
        self.entries.lock().ok()?.get(title).cloned()
    }

    /// Store `poster_url` for `title` unless the title already has one.
    ///
    /// Returns whether a new entry was written. Empty titles or URLs are ignored.
    pub fn put(&self, title: &str, poster_url: &str) -> bool {
        self.bulk_ingest([(title, Some(poster_url))]) == 1
    }

    /// `put` every entry that has both a non-empty title and poster URL.
    /// Persists at most once. Returns the number of new entries.
    ///
    /// Entries another handle persisted since this one loaded are merged in
    /// first, so a write never drops them and never replaces their URLs.
    pub fn bulk_ingest<'a, I>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let candidates: Vec<(&str, &str)> = entries
            .into_iter()
            .filter_map(|(title, url)| Some((title, url.filter(|u| !u.is_empty())?)))
            .filter(|(title, _)| !title.is_empty())
            .collect();
        if candidates.is_empty() {
            return 0;
        }

        let Ok(mut cached) = self.entries.lock() else {
            return 0;
        };
        cached.extend(load_entries(self.store.as_ref()));

        let mut added = 0;
        for (title, poster_url) in candidates {
            if cached.contains_key(title) {
                continue;
            }
            cached.insert(title.to_string(), poster_url.to_string());
            added += 1;
        }

        if added > 0 {
            self.persist(&cached);
        }
        added
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, entries: &BTreeMap<String, String>) {
        let content = match serde_json::to_string(entries) {
            Ok(c) => c,
            Err(e) => {
                warn!("failed to serialize poster cache: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(POSTER_CACHE_KEY, &content) {
            warn!("failed to persist poster cache: {:#}", e);
        }
    }
}

fn load_entries(store: &dyn KeyValueStore) -> BTreeMap<String, String> {
    let raw = match store.get(POSTER_CACHE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return BTreeMap::new(),
        Err(e) => {
            warn!("failed to read poster cache, starting empty: {:#}", e);
            return BTreeMap::new();
        }
    };

    let Ok(Value::Object(map)) = serde_json::from_str::<Value>(&raw) else {
        warn!("poster cache is corrupt, starting empty");
        return BTreeMap::new();
    };

    map.into_iter()
        .filter_map(|(title, url)| match url {
            Value::String(url) if !title.is_empty() && !url.is_empty() => Some((title, url)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests;
