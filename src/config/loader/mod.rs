use crate::config::Config;
use crate::utils::{ensure_dir, get_moodflix_home};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// (env var, setter) pairs applied after the config file is read.
const ENV_OVERRIDES: &[(&str, fn(&mut Config, String))] = &[
    ("MOODFLIX_API_BASE_URL", |c, v| c.api.base_url = v),
    ("MOODFLIX_STATE_DIR", |c, v| c.storage.dir = Some(PathBuf::from(v))),
];

pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_moodflix_home()?.join("config.json"))
}

pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let default_path = get_config_path().unwrap_or_else(|_| PathBuf::from("config.json"));
    let path = config_path.unwrap_or(default_path.as_path());

    let mut config = if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config JSON from {}", path.display()))?
    } else {
        debug!("no config at {}, using defaults", path.display());
        Config::default()
    };

    apply_env_overrides(&mut config);

    config
        .validate()
        .with_context(|| "Configuration validation failed")?;

    Ok(config)
}

/// Apply `MOODFLIX_*` environment overrides. Empty values are ignored.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides_from(config, |name| std::env::var(name).ok());
}

fn apply_overrides_from(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    for (name, set) in ENV_OVERRIDES {
        if let Some(value) = lookup(name)
            && !value.trim().is_empty()
        {
            debug!("applying override from {}", name);
            set(config, value.trim().to_string());
        }
    }
}

pub fn save_config(config: &Config, config_path: Option<&Path>) -> Result<()> {
    let default_path = get_config_path().unwrap_or_else(|_| PathBuf::from("config.json"));
    let path = config_path.unwrap_or(default_path.as_path());

    ensure_dir(path.parent().context("Config path has no parent")?)?;

    let content = serde_json::to_string_pretty(config)?;
    crate::utils::atomic_write(path, &content)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}
