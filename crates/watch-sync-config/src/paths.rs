use anyhow::Result;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("REWATCH_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

const RAW_STEM: &str = "trakt_raw";
const HISTORY_STEM: &str = "trakt_history";

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("rewatch");

        Ok(Self {
            config_dir: base_dir.clone(),
            data_dir: base_dir.join("data"),
        })
    }

    pub fn from_docker_env() -> Self {
        let base = container_base_path();
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
        }
    }

    /// Rooted at an explicit directory (tests and `--data-dir` style overrides)
    pub fn with_base(base: &Path) -> Self {
        Self {
            config_dir: base.to_path_buf(),
            data_dir: base.join("data"),
        }
    }

    /// Replace the data directory, keeping the config location
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = data_dir;
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.config_dir.join("credentials.toml")
    }

    pub fn env_file(&self) -> PathBuf {
        self.config_dir.join(".env")
    }

    /// Raw cache for a user; `None` is the primary user
    pub fn raw_file(&self, user: Option<&str>) -> PathBuf {
        self.data_dir.join(Self::file_name(RAW_STEM, user))
    }

    /// Normalized output for a user; `None` is the primary user
    pub fn history_file(&self, user: Option<&str>) -> PathBuf {
        self.data_dir.join(Self::file_name(HISTORY_STEM, user))
    }

    fn file_name(stem: &str, user: Option<&str>) -> String {
        match user.map(str::trim).filter(|u| !u.is_empty()) {
            Some(user) => format!("{}_{}.json", stem, user),
            None => format!("{}.json", stem),
        }
    }

}

impl Default for PathManager {
    fn default() -> Self {
        // The container base directory only exists inside the image
        let base = container_base_path();
        if base.exists() {
            return Self::from_docker_env();
        }

        Self::new().unwrap_or_else(|_| Self::from_docker_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_user_uses_default_file_names() {
        let paths = PathManager::with_base(Path::new("/tmp/rw"));
        assert_eq!(paths.raw_file(None), PathBuf::from("/tmp/rw/data/trakt_raw.json"));
        assert_eq!(paths.history_file(Some("  ")), PathBuf::from("/tmp/rw/data/trakt_history.json"));
    }

    #[test]
    fn named_user_gets_suffixed_files() {
        let paths = PathManager::with_base(Path::new("/tmp/rw"));
        assert_eq!(paths.raw_file(Some("alice")), PathBuf::from("/tmp/rw/data/trakt_raw_alice.json"));
        assert_eq!(paths.history_file(Some("alice")), PathBuf::from("/tmp/rw/data/trakt_history_alice.json"));
    }
}
