pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{load_env_file, Config, LoggingConfig, PosterConfig, SyncSettings, TraktConfig};
pub use credentials::CredentialStore;
pub use paths::{container_base_path, PathManager};
