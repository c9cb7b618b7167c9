use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub ilist: IlistConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct IlistConfig {
    /// Base URL of the iList CRM API
    pub base_url: String,
    /// API token used for scheduled runs
    pub api_token: String,
    /// Default page size for sync fetches
    pub batch_size: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    /// Shared secret expected in the X-Sync-Secret header of the cron trigger
    pub shared_secret: String,
    /// Advice surfaced by the sync status endpoint
    pub recommended_schedule: String,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/app.db"

[ilist]
base_url = "https://api.ilist.example"
api_token = ""
batch_size = 50

[sync]
shared_secret = "change-me"
recommended_schedule = "incremental hourly, full daily at 04:00"
"#;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Load configuration from config.toml.
///
/// Search order:
/// 1. Next to the executable (production)
/// 2. Current directory (development)
/// 3. Embedded default
pub fn load_config() -> anyhow::Result<Config> {
    let mut candidates = Vec::new();
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("config.toml"));
        }
    }
    candidates.push(PathBuf::from("config.toml"));

    for path in &candidates {
        if path.exists() {
            tracing::info!("Loading config from: {}", path.display());
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            return Ok(config);
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Install the loaded configuration for the lifetime of the process
pub fn set_config(config: Config) -> anyhow::Result<()> {
    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Config already initialized"))
}

pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config has not been initialized")
}

/// Resolve the database file path, relative paths being taken
/// relative to the executable directory
pub fn get_database_path(config: &Config) -> anyhow::Result<PathBuf> {
    let db_path = Path::new(&config.database.path);

    if db_path.is_absolute() {
        return Ok(db_path.to_path_buf());
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return Ok(exe_dir.join(db_path));
        }
    }

    Ok(PathBuf::from(&config.database.path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/app.db");
        assert_eq!(config.ilist.batch_size, 50);
        assert!(!config.sync.shared_secret.is_empty());
    }
}
