pub mod loader;
pub mod schema;

pub use loader::{apply_env_overrides, get_config_path, load_config, save_config};
pub use schema::{ApiConfig, Config, DEFAULT_BASE_URL, StorageConfig};
