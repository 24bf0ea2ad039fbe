use super::*;
use crate::client::ShowRef;
use clap::CommandFactory;

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_choice_accepts_backend_spelling() {
    assert_eq!(parse_choice::<Mood>("adrenaline").unwrap(), Mood::Adrenaline);
    assert_eq!(parse_choice::<Mood>(" Dark ").unwrap(), Mood::Dark);
    assert_eq!(
        parse_choice::<BingePreference>("short_series").unwrap(),
        BingePreference::ShortSeries
    );
    assert!(parse_choice::<WatchingContext>("crowd").is_err());
}

#[test]
fn test_recommend_flags_build_preferences() {
    let cli = Cli::try_parse_from([
        "moodflix",
        "recommend",
        "--age",
        "28",
        "--mood",
        "curious",
        "--genre",
        "drama",
        "--genre",
        "sci-fi",
        "--episode-length",
        "short",
    ])
    .unwrap();

    let Commands::Recommend(args) = cli.command else {
        panic!("expected recommend");
    };
    let prefs = args.into_preferences();
    assert_eq!(prefs.age, Some(28));
    assert_eq!(prefs.mood, Some(Mood::Curious));
    assert_eq!(prefs.preferred_genres, vec!["drama", "sci-fi"]);
    assert_eq!(
        prefs.episode_length_preference,
        Some(EpisodeLengthPreference::Short)
    );
    assert_eq!(prefs.watching_context, None);
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "moodflix",
        "watchlist",
        "list",
        "--base-url",
        "http://example.test",
        "-v",
    ])
    .unwrap();
    assert!(cli.verbose());
    assert_eq!(cli.base_url.as_deref(), Some("http://example.test"));
}

#[test]
fn test_login_accepts_password_flag() {
    let parsed = Cli::try_parse_from(["moodflix", "login", "--email", "a@b.c", "--password", "pw"]);
    assert!(parsed.is_ok());
}

#[test]
fn test_show_ref_from_flags() {
    let with_poster = subcommands::show_ref("Dark".into(), Some("http://p/dark.jpg".into()));
    assert_eq!(with_poster.poster_url(), Some("http://p/dark.jpg"));
    let bare = subcommands::show_ref("Dark".into(), None);
    assert_eq!(bare, ShowRef::Title("Dark".into()));
}

#[test]
fn test_auth_hint_only_for_auth_failures() {
    let unauthorized = anyhow::Error::from(MoodflixError::Http {
        status: 401,
        path: "/watchlist".into(),
        message: "Not authenticated".into(),
    });
    assert!(auth_hint(&unauthorized).is_some());

    let wrapped = anyhow::Error::from(MoodflixError::Http {
        status: 403,
        path: "/auth/me".into(),
        message: "Forbidden".into(),
    })
    .context("fetching user");
    assert!(auth_hint(&wrapped).is_some());

    let missing = anyhow::Error::from(MoodflixError::Http {
        status: 404,
        path: "/watchlist".into(),
        message: "Not Found".into(),
    });
    assert!(auth_hint(&missing).is_none());
    assert!(auth_hint(&anyhow::anyhow!("disk full")).is_none());
}

#[test]
fn test_resolve_config_flag_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"api": {"baseUrl": "http://file.test"}}"#).unwrap();

    let config = resolve_config(Some(&path), Some("http://flag.test".into())).unwrap();
    assert_eq!(config.api.base_url, "http://flag.test");
}

#[test]
fn test_resolve_config_rejects_bad_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    assert!(resolve_config(Some(&path), Some("ftp://nope".into())).is_err());
}

#[test]
fn test_init_writes_default_config_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    subcommands::init(Some(&path), false).unwrap();
    assert!(path.exists());

    std::fs::write(&path, "custom").unwrap();
    subcommands::init(Some(&path), false).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "custom");

    subcommands::init(Some(&path), true).unwrap();
    let saved = load_config(Some(&path)).unwrap();
    assert_eq!(saved.api.base_url, Config::default().api.base_url);
}
