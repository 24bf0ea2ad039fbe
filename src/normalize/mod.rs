//! Reconcile the backend's watchlist representations into one canonical shape.
//!
//! Backends answer with bare arrays or wrapped objects, and with lists of
//! plain titles or lists of records. The raw payload is classified first, then
//! handed to the branch for that shape. Anything unrecognized becomes an
//! empty list.

use crate::cache::PosterCache;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Keys a wrapped watchlist response may carry its list under, in priority order.
pub const WATCHLIST_KEYS: &[&str] = &["watchlist", "items", "results"];

/// Keys a wrapped recommendation response may carry its list under.
pub const RECOMMENDATION_KEYS: &[&str] = &["recommendations", "results"];

/// Record fields that may hold a poster URL, in priority order.
pub(crate) const POSTER_FIELDS: &[&str] = &["posterUrl", "poster_url"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub title: String,
    #[serde(rename = "posterUrl", alias = "poster_url")]
    pub poster_url: Option<String>,
}

impl WatchlistEntry {
    pub fn new(title: impl Into<String>, poster_url: Option<String>) -> Self {
        Self {
            title: title.into(),
            poster_url,
        }
    }
}

/// Shape of a raw watchlist payload.
#[derive(Debug)]
enum Shape<'a> {
    /// `["A", "B"]`
    Titles(&'a [Value]),
    /// `[{"title": "A", "poster_url": ...}]`
    Records(&'a [Value]),
    Unrecognized,
}

fn classify(raw: &Value) -> Shape<'_> {
    match raw {
        Value::Array(items) => classify_items(items),
        _ => Shape::Unrecognized,
    }
}

fn classify_items(items: &[Value]) -> Shape<'_> {
    match items.first() {
        Some(Value::String(_)) => Shape::Titles(items),
        _ => Shape::Records(items),
    }
}

/// Find the list in `value`: the value itself if it is an array, otherwise the
/// first of `keys` holding an array.
pub fn unwrap_list<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a [Value]> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) => keys
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice),
        _ => None,
    }
}

/// Normalize a bare array into watchlist entries, backfilling posters from
/// the cache. Order is preserved and duplicates are kept.
pub fn normalize_watchlist(raw: &Value, cache: &PosterCache) -> Vec<WatchlistEntry> {
    normalize_shape(classify(raw), cache)
}

/// Normalize a full response body, bare or wrapped under [`WATCHLIST_KEYS`].
pub fn normalize_response(body: &Value, cache: &PosterCache) -> Vec<WatchlistEntry> {
    match unwrap_list(body, WATCHLIST_KEYS) {
        Some(items) => normalize_shape(classify_items(items), cache),
        None => Vec::new(),
    }
}

fn normalize_shape(shape: Shape<'_>, cache: &PosterCache) -> Vec<WatchlistEntry> {
    match shape {
        Shape::Titles(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|title| !title.is_empty())
            .map(|title| WatchlistEntry::new(title, cache.get(title)))
            .collect(),
        Shape::Records(items) => items
            .iter()
            .filter_map(|item| record_entry(item, cache))
            .collect(),
        Shape::Unrecognized => Vec::new(),
    }
}

fn record_entry(item: &Value, cache: &PosterCache) -> Option<WatchlistEntry> {
    let title = item
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())?;

    let poster_url = poster_url_field(item)
        .map(str::to_string)
        .or_else(|| cache.get(title));

    Some(WatchlistEntry::new(title, poster_url))
}

/// First non-empty string among the record's [`POSTER_FIELDS`].
pub(crate) fn poster_url_field(item: &Value) -> Option<&str> {
    POSTER_FIELDS.iter().find_map(|field| {
        item.get(*field)
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    })
}
