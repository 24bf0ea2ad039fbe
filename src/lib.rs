#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Keeping format!("{}", x) over format!("{x}") for readability with complex exprs
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod normalize;
pub mod session;
pub mod storage;
pub(crate) mod utils;

pub use cache::PosterCache;
pub use client::{MoodflixClient, Preferences, Show, ShowRef, WatchlistResponse};
pub use config::Config;
pub use dispatch::{Dispatcher, RequestOptions};
pub use errors::{MoodflixError, MoodflixResult};
pub use normalize::WatchlistEntry;
pub use session::SessionStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
