use std::path::PathBuf;
use thiserror::Error;
use watch_sync_sources::SourceError;

/// Fatal sync failures. Per-item resolution problems never surface here.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("Failed to fetch watch history: {0}")]
    HistoryFetch(#[source] SourceError),

    #[error("Catalog returned no watch history")]
    EmptyHistory,

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl SyncError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SyncError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<SourceError> for SyncError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NotAuthenticated(msg) => SyncError::NotAuthenticated(msg),
            other => SyncError::HistoryFetch(other),
        }
    }
}
