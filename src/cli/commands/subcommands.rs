use super::{Config, MoodflixClient, WatchlistCommands, print_json};
use crate::client::{Show, ShowRef};
use crate::config::{get_config_path, save_config};
use anyhow::Result;
use std::path::Path;

pub(super) fn init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };
    if path.exists() && !force {
        println!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
        return Ok(());
    }

    save_config(&Config::default(), Some(path.as_path()))?;
    println!("Created config at {}", path.display());
    Ok(())
}

pub(super) async fn watchlist(client: &MoodflixClient, cmd: WatchlistCommands) -> Result<()> {
    let response = match cmd {
        WatchlistCommands::List => client.fetch_watchlist().await?,
        WatchlistCommands::Add { title, poster } => {
            client.add_to_watchlist(show_ref(title, poster)).await?
        }
        WatchlistCommands::Remove { title } => client.remove_from_watchlist(&title).await?,
    };
    print_json(&response)
}

pub(super) fn show_ref(title: String, poster: Option<String>) -> ShowRef {
    match poster {
        Some(poster) => Show::titled(title).with_poster(poster).into(),
        None => title.into(),
    }
}

