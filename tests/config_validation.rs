use moodflix::config::{Config, load_config, save_config};
use moodflix::{MoodflixClient, MoodflixError};

#[test]
fn test_saved_config_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.api.base_url = "https://moodflix.example.com".into();
    config.api.request_timeout_secs = 12;
    save_config(&config, Some(&path)).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("baseUrl"));
    assert!(raw.contains("requestTimeoutSecs"));

    let loaded = load_config(Some(&path)).unwrap();
    assert_eq!(loaded.api.request_timeout_secs, 12);
}

#[test]
fn test_invalid_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    std::fs::write(&path, r#"{"api": {"baseUrl": "not a url"}}"#).unwrap();
    let err = load_config(Some(&path)).unwrap_err();
    assert!(format!("{err:#}").contains("baseUrl"), "{err:#}");

    std::fs::write(&path, "{ broken").unwrap();
    assert!(load_config(Some(&path)).is_err());
}

#[test]
fn test_client_refuses_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.api.connect_timeout_secs = 0;
    config.storage.dir = Some(dir.path().to_path_buf());

    let err = MoodflixClient::new(&config).err().unwrap();
    assert!(matches!(err, MoodflixError::Config(_)), "{err:?}");
}

#[test]
fn test_client_creates_state_dir() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("a").join("b");
    let mut config = Config::default();
    config.storage.dir = Some(state.clone());

    let client = MoodflixClient::new(&config).unwrap();
    assert!(state.is_dir());
    assert!(!client.is_authenticated());
    assert!(client.cache().is_empty());
}
