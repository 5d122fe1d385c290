use anyhow::Result;
use tracing::debug;
use watch_sync_config::{load_env_file, Config, PathManager};

/// `.env`, then `config.toml`, then environment overrides
pub fn load_config(paths: &PathManager) -> Result<Config> {
    load_env_file(&paths.env_file());
    let mut config = Config::load_or_default(&paths.config_file())?;
    config.apply_env_overrides(|key| std::env::var(key).ok());
    debug!("Configuration loaded from {}", paths.config_file().display());
    Ok(config)
}

/// Paths with the `[sync] data_dir` override applied
pub fn data_paths(config: &Config, paths: &PathManager) -> PathManager {
    let base = PathManager::with_base(paths.config_dir());
    match &config.sync.data_dir {
        Some(dir) => base.with_data_dir(dir.clone()),
        None => base.with_data_dir(paths.data_dir().to_path_buf()),
    }
}
