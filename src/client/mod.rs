//! Public operations composed from the dispatcher, normalizer, cache and session.

pub mod types;

pub use types::{
    BingePreference, EpisodeLengthPreference, Mood, Preferences, SearchResult, Show, ShowRef,
    TokenResponse, User, WatchingContext, WatchlistResponse,
};

use crate::cache::PosterCache;
use crate::config::{Config, StorageConfig};
use crate::dispatch::{Dispatcher, RequestOptions, paths};
use crate::errors::{MoodflixError, MoodflixResult};
use crate::normalize::{
    POSTER_FIELDS, RECOMMENDATION_KEYS, normalize_response, poster_url_field, unwrap_list,
};
use crate::session::SessionStore;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::utils::http::http_client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Backend cap on search result counts.
pub const MAX_TOP_K: usize = 50;

pub struct MoodflixClient {
    dispatcher: Dispatcher,
    cache: Arc<PosterCache>,
}

impl MoodflixClient {
    /// Build a client whose cache and session persist under the configured
    /// state directory.
    ///
    /// Only an invalid API config is an error. An unusable state directory
    /// leaves the client with process-local state.
    pub fn new(config: &Config) -> MoodflixResult<Self> {
        config.validate()?;
        let store = open_store(&config.storage);

        let session = Arc::new(SessionStore::new(store.clone()));
        let cache = Arc::new(PosterCache::new(store));
        let dispatcher = Dispatcher::with_client(
            http_client(&config.api),
            config.api.normalized_base_url(),
            session,
        );
        Ok(Self::with_parts(dispatcher, cache))
    }

    /// Assemble a client from existing parts. The session is the one the
    /// dispatcher reads its bearer token from.
    pub fn with_parts(dispatcher: Dispatcher, cache: Arc<PosterCache>) -> Self {
        Self { dispatcher, cache }
    }

    pub fn cache(&self) -> &Arc<PosterCache> {
        &self.cache
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.dispatcher.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().has_token()
    }

    /// Ask the backend for shows matching `preferences`.
    ///
    /// Returned posters are remembered so later title-only watchlists can
    /// show them.
    pub async fn recommend(&self, preferences: &Preferences) -> MoodflixResult<Vec<Show>> {
        let body = serde_json::to_value(preferences)
            .map_err(|e| MoodflixError::Input(format!("invalid preferences: {}", e)))?;
        let response = self
            .dispatcher
            .try_paths(paths::RECOMMEND, &RequestOptions::post(body))
            .await?;

        let items = unwrap_list(&response, RECOMMENDATION_KEYS).ok_or_else(|| {
            MoodflixError::Decode("recommendation response carried no list".to_string())
        })?;
        let shows: Vec<Show> = decode_objects(items);

        self.cache.bulk_ingest(
            shows
                .iter()
                .map(|s| (s.title.as_str(), s.poster_url.as_deref())),
        );
        Ok(shows)
    }

    /// Save a show by title. A full [`Show`] with a poster also seeds the cache.
    pub async fn add_to_watchlist(
        &self,
        show: impl Into<ShowRef>,
    ) -> MoodflixResult<WatchlistResponse> {
        let show = show.into();
        let title = required(show.title(), "title")?;
        if let Some(poster_url) = show.poster_url() {
            self.cache.put(title, poster_url);
        }

        let response = self
            .dispatcher
            .try_paths(
                paths::WATCHLIST_ADD,
                &RequestOptions::post(json!({ "title": title })),
            )
            .await?;
        Ok(self.watchlist_from(&response))
    }

    pub async fn remove_from_watchlist(&self, title: &str) -> MoodflixResult<WatchlistResponse> {
        let title = required(title, "title")?;
        let response = self
            .dispatcher
            .try_paths(
                paths::WATCHLIST_REMOVE,
                &RequestOptions::post(json!({ "title": title })),
            )
            .await?;
        Ok(self.watchlist_from(&response))
    }

    pub async fn fetch_watchlist(&self) -> MoodflixResult<WatchlistResponse> {
        let response = self
            .dispatcher
            .try_paths(paths::WATCHLIST_FETCH, &RequestOptions::get())
            .await?;
        Ok(self.watchlist_from(&response))
    }

    pub async fn register(&self, email: &str, password: &str) -> MoodflixResult<User> {
        let body = credentials(email, password)?;
        let response = self
            .dispatcher
            .try_paths(paths::AUTH_REGISTER, &RequestOptions::post(body))
            .await?;
        decode(response, "user")
    }

    /// Log in and keep the returned bearer token for subsequent calls.
    pub async fn login(&self, email: &str, password: &str) -> MoodflixResult<TokenResponse> {
        let body = credentials(email, password)?;
        let response = self
            .dispatcher
            .try_paths(paths::AUTH_LOGIN, &RequestOptions::post(body))
            .await?;

        let token: TokenResponse = decode(response, "token")?;
        if token.access_token.trim().is_empty() {
            return Err(MoodflixError::Decode(
                "login response carried an empty access_token".to_string(),
            ));
        }
        self.session().set_token(&token.access_token);
        info!("logged in as {}", email.trim());
        Ok(token)
    }

    pub async fn fetch_current_user(&self) -> MoodflixResult<User> {
        let response = self
            .dispatcher
            .try_paths(paths::AUTH_ME, &RequestOptions::get())
            .await?;
        decode(response, "user")
    }

    /// Forget the session token. Purely local.
    pub fn logout(&self) {
        self.session().clear_token();
        info!("logged out");
    }

    /// Free-text search over show embeddings.
    pub async fn semantic_search(
        &self,
        query: &str,
        top_k: usize,
    ) -> MoodflixResult<Vec<SearchResult>> {
        let query = required(query, "query")?;
        let body = json!({ "query": query, "top_k": clamp_top_k(top_k) });
        self.search(paths::SEARCH_SEMANTIC, body).await
    }

    /// Shows closest to the show with id `show_id`.
    pub async fn more_like_this(
        &self,
        show_id: i64,
        top_k: usize,
    ) -> MoodflixResult<Vec<SearchResult>> {
        let body = json!({ "show_id": show_id, "top_k": clamp_top_k(top_k) });
        self.search(paths::SEARCH_SIMILAR, body).await
    }

    async fn search(&self, candidates: &[&str], body: Value) -> MoodflixResult<Vec<SearchResult>> {
        let response = self
            .dispatcher
            .try_paths(candidates, &RequestOptions::post(body))
            .await?;
        let items = unwrap_list(&response, &["results"]).ok_or_else(|| {
            MoodflixError::Decode("search response carried no list".to_string())
        })?;
        let results: Vec<SearchResult> = decode_objects(items);

        self.cache.bulk_ingest(
            results
                .iter()
                .map(|r| (r.title.as_str(), r.poster_url.as_deref())),
        );
        Ok(results)
    }

    fn watchlist_from(&self, response: &Value) -> WatchlistResponse {
        WatchlistResponse {
            watchlist: normalize_response(response, &self.cache),
        }
    }
}

fn open_store(storage: &StorageConfig) -> Arc<dyn KeyValueStore> {
    let opened = storage
        .resolved_dir()
        .and_then(|dir| FileStore::new(&dir));
    match opened {
        Ok(store) => {
            debug!("client state directory: {}", store.dir().display());
            Arc::new(store)
        }
        Err(e) => {
            warn!(
                "state directory unusable, keeping session and poster cache in memory: {:#}",
                e
            );
            Arc::new(MemoryStore::new())
        }
    }
}

fn required<'a>(value: &'a str, field: &str) -> MoodflixResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MoodflixError::Input(format!("{} is required", field)));
    }
    Ok(value)
}

fn credentials(email: &str, password: &str) -> MoodflixResult<Value> {
    let email = required(email, "email")?;
    if password.is_empty() {
        return Err(MoodflixError::Input("password is required".to_string()));
    }
    Ok(json!({ "email": email, "password": password }))
}

fn clamp_top_k(top_k: usize) -> usize {
    top_k.clamp(1, MAX_TOP_K)
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> MoodflixResult<T> {
    serde_json::from_value(value)
        .map_err(|e| MoodflixError::Decode(format!("malformed {} response: {}", what, e)))
}

/// Decode every object element, skipping anything that does not fit `T`.
fn decode_objects<T: DeserializeOwned>(items: &[Value]) -> Vec<T> {
    items
        .iter()
        .filter(|item| item.is_object())
        .filter_map(|item| match T::deserialize(with_canonical_poster(item)) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!("skipping malformed list element: {}", e);
                None
            }
        })
        .collect()
}

/// Copy of `item` whose poster sits under `poster_url` alone, picked with the
/// same precedence the watchlist normalizer uses.
fn with_canonical_poster(item: &Value) -> Value {
    let poster_url = poster_url_field(item).map(str::to_string);
    let mut item = item.clone();
    if let Value::Object(map) = &mut item {
        for field in POSTER_FIELDS {
            map.remove(*field);
        }
        if let Some(poster_url) = poster_url {
            map.insert("poster_url".to_string(), Value::String(poster_url));
        }
    }
    item
}
