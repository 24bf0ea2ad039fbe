mod subcommands;

#[cfg(test)]
mod tests;

use crate::client::{
    BingePreference, EpisodeLengthPreference, Mood, MoodflixClient, Preferences, WatchingContext,
};
use crate::config::{Config, load_config};
use crate::errors::MoodflixError;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "moodflix")]
#[command(about = "Mood-based TV recommendations and watchlist", version)]
pub struct Cli {
    /// Path to config.json (defaults to ~/.moodflix/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the backend base URL
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Init {
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Get show recommendations for a mood
    Recommend(RecommendArgs),
    /// Manage the saved watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: WatchlistCommands,
    },
    /// Free-text semantic search
    Search {
        query: String,
        #[arg(long, short = 'k', default_value_t = 10)]
        top_k: usize,
    },
    /// Shows similar to a given show id
    Similar {
        show_id: i64,
        #[arg(long, short = 'k', default_value_t = 10)]
        top_k: usize,
    },
    /// Create an account
    Register(CredentialArgs),
    /// Log in and store the session token
    Login(CredentialArgs),
    /// Show the logged-in user
    Me,
    /// Forget the stored session token
    Logout,
}

#[derive(Subcommand)]
enum WatchlistCommands {
    /// List saved shows
    List,
    /// Save a show
    Add {
        title: String,
        /// Poster URL to remember for this title
        #[arg(long)]
        poster: Option<String>,
    },
    /// Remove a saved show
    Remove { title: String },
}

#[derive(Args)]
struct RecommendArgs {
    #[arg(long)]
    age: Option<u32>,
    /// chill, happy, familiar, focused, adrenaline, dark or curious
    #[arg(long, value_parser = parse_choice::<Mood>)]
    mood: Option<Mood>,
    /// binge or short_series
    #[arg(long, value_parser = parse_choice::<BingePreference>)]
    binge: Option<BingePreference>,
    /// Preferred genre, repeatable
    #[arg(long = "genre")]
    genres: Vec<String>,
    #[arg(long)]
    language: Option<String>,
    /// short, long or any
    #[arg(long, value_parser = parse_choice::<EpisodeLengthPreference>)]
    episode_length: Option<EpisodeLengthPreference>,
    /// alone, partner or family
    #[arg(long, value_parser = parse_choice::<WatchingContext>)]
    context: Option<WatchingContext>,
    /// Free-text description of what you want to watch
    #[arg(long, short = 'q')]
    query: Option<String>,
}

impl RecommendArgs {
    fn into_preferences(self) -> Preferences {
        Preferences {
            age: self.age,
            mood: self.mood,
            binge_preference: self.binge,
            preferred_genres: self.genres,
            language_preference: self.language,
            episode_length_preference: self.episode_length,
            watching_context: self.context,
            query: self.query,
            ..Default::default()
        }
    }
}

#[derive(Args)]
struct CredentialArgs {
    #[arg(long, short = 'e')]
    email: String,
    #[arg(long, short = 'p', env = "MOODFLIX_PASSWORD", hide_env_values = true)]
    password: String,
}

/// Parse a snake_case enum value the same way the backend spells it.
fn parse_choice<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_ascii_lowercase()))
        .map_err(|_| format!("unsupported value '{}'", raw))
}

pub async fn run(cli: Cli) -> Result<()> {
    let result = dispatch(cli).await;
    if let Err(ref e) = result
        && let Some(hint) = auth_hint(e)
    {
        eprintln!("{}", hint);
    }
    result
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        base_url,
        command,
        ..
    } = cli;
    let open_client = || connect(config_path.as_deref(), base_url.clone());

    match command {
        Commands::Init { force } => subcommands::init(config_path.as_deref(), force)?,
        Commands::Recommend(args) => {
            let shows = open_client()?.recommend(&args.into_preferences()).await?;
            print_json(&shows)?;
        }
        Commands::Watchlist { cmd } => subcommands::watchlist(&open_client()?, cmd).await?,
        Commands::Search { query, top_k } => {
            print_json(&open_client()?.semantic_search(&query, top_k).await?)?;
        }
        Commands::Similar { show_id, top_k } => {
            print_json(&open_client()?.more_like_this(show_id, top_k).await?)?;
        }
        Commands::Register(creds) => {
            let user = open_client()?.register(&creds.email, &creds.password).await?;
            print_json(&user)?;
        }
        Commands::Login(creds) => {
            open_client()?.login(&creds.email, &creds.password).await?;
            println!("Logged in as {}", creds.email.trim());
        }
        Commands::Me => print_json(&open_client()?.fetch_current_user().await?)?,
        Commands::Logout => {
            open_client()?.logout();
            println!("Logged out");
        }
    }

    Ok(())
}

fn connect(path: Option<&Path>, base_url: Option<String>) -> Result<MoodflixClient> {
    let config = resolve_config(path, base_url)?;
    MoodflixClient::new(&config).context("Failed to set up client")
}

fn resolve_config(path: Option<&Path>, base_url: Option<String>) -> Result<Config> {
    let mut config = load_config(path)?;
    if let Some(url) = base_url {
        config.api.base_url = url;
        config.validate()?;
    }
    Ok(config)
}

/// Message to show when the backend rejected the session.
fn auth_hint(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<MoodflixError>())
        .filter(|e| e.is_auth_failure())
        .map(|_| "Please log in: run `moodflix login --email <email>`")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
