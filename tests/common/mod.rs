// Shared test helpers, not all used by every test binary.
#![allow(unused)]

use moodflix::config::{ApiConfig, Config, StorageConfig};
use moodflix::MoodflixClient;
use tempfile::TempDir;
use wiremock::MockServer;

/// A client whose cache and session live in a private temp directory.
pub struct TestClient {
    pub client: MoodflixClient,
    pub config: Config,
    _state: TempDir,
}

impl TestClient {
    pub fn new(server: &MockServer) -> Self {
        let state = TempDir::new().unwrap();
        let config = Config {
            api: ApiConfig {
                base_url: server.uri(),
                ..ApiConfig::default()
            },
            storage: StorageConfig {
                dir: Some(state.path().join("state")),
            },
        };
        let client = MoodflixClient::new(&config).unwrap();
        Self {
            client,
            config,
            _state: state,
        }
    }

    /// A second client over the same state directory, as after a restart.
    pub fn reopen(&self) -> MoodflixClient {
        MoodflixClient::new(&self.config).unwrap()
    }
}

pub fn state_file(test: &TestClient, key: &str) -> std::path::PathBuf {
    test.config
        .storage
        .dir
        .clone()
        .unwrap()
        .join(format!("{}.json", key))
}
