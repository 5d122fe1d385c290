use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub trakt: TraktConfig,
    #[serde(default)]
    pub posters: PosterConfig,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TraktConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for TraktConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_url: default_api_url(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct PosterConfig {
    /// RatingPosterDB key; no key means no constructed poster URLs
    #[serde(default)]
    pub rpdb_api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SyncSettings {
    /// Overrides the platform data directory
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// User whose files carry no suffix
    #[serde(default)]
    pub primary_user: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_cast_limit")]
    pub cast_limit: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            primary_user: None,
            request_timeout_secs: default_request_timeout_secs(),
            page_size: default_page_size(),
            cast_limit: default_cast_limit(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    pub file: Option<PathBuf>,
}

fn default_api_url() -> String {
    "https://api.trakt.tv".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> u32 {
    100
}

fn default_cast_limit() -> usize {
    5
}

/// Load `KEY=value` pairs from a `.env` file into the process environment.
/// A missing file is not an error.
pub fn load_env_file(path: &Path) {
    match dotenv::from_path(path) {
        Ok(()) => debug!("Loaded environment from {}", path.display()),
        Err(e) => debug!("No .env loaded from {}: {}", path.display(), e),
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Missing file yields defaults; an unreadable or malformed one is an error
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(path)
            .map_err(|e| anyhow::anyhow!("Malformed config file {}: {}", path.display(), e))
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `TRAKT_CLIENT_ID`, `TRAKT_CLIENT_SECRET` and `RPDB_API_KEY`
    /// from the given lookup (normally `std::env::var`)
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(id) = non_empty("TRAKT_CLIENT_ID") {
            self.trakt.client_id = id;
        }
        if let Some(secret) = non_empty("TRAKT_CLIENT_SECRET") {
            self.trakt.client_secret = secret;
        }
        if let Some(key) = non_empty("RPDB_API_KEY") {
            self.posters.rpdb_api_key = Some(key);
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.is_trakt_configured() {
            return Err(anyhow::anyhow!(
                "Trakt client_id is not configured (set [trakt].client_id or TRAKT_CLIENT_ID)"
            ));
        }
        if self.sync.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("request_timeout_secs must be positive"));
        }
        if self.sync.page_size == 0 {
            return Err(anyhow::anyhow!("page_size must be positive"));
        }
        Ok(())
    }

    pub fn is_trakt_configured(&self) -> bool {
        !self.trakt.client_id.trim().is_empty() && self.trakt.client_id != "YOUR_CLIENT_ID"
    }

    /// Map an invocation user onto a file suffix (`None` for the primary user)
    pub fn file_user<'a>(&self, user: Option<&'a str>) -> Option<&'a str> {
        match (user, self.sync.primary_user.as_deref()) {
            (Some(u), Some(primary)) if u == primary => None,
            (u, _) => u,
        }
    }

    pub fn rpdb_api_key(&self) -> Option<&str> {
        self.posters
            .rpdb_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }
}
