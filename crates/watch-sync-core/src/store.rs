use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use watch_sync_config::PathManager;
use watch_sync_models::{HistoryDocument, RawRecord};
use crate::error::SyncError;

/// The two persisted files of one user: raw cache and normalized output
#[derive(Debug, Clone)]
pub struct HistoryStore {
    raw_path: PathBuf,
    history_path: PathBuf,
}

impl HistoryStore {
    pub fn new(raw_path: PathBuf, history_path: PathBuf) -> Self {
        Self {
            raw_path,
            history_path,
        }
    }

    /// Files for `user` under the data directory; `None` is the primary user
    pub fn for_user(paths: &PathManager, user: Option<&str>) -> Self {
        Self::new(paths.raw_file(user), paths.history_file(user))
    }

    pub fn raw_path(&self) -> &Path {
        &self.raw_path
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    /// Cached raw records. Missing, unreadable and corrupt files all read as
    /// no cache; the file itself is left alone until the next successful write.
    pub fn load_raw(&self) -> Option<Vec<RawRecord>> {
        let records = load_json::<Vec<RawRecord>>(&self.raw_path, "raw cache")?;
        info!("Cache hit: raw history (loaded {} items)", records.len());
        Some(records)
    }

    /// Previously written normalized document; `None` when missing or corrupt
    pub fn try_load_history(&self) -> Option<HistoryDocument> {
        load_json::<HistoryDocument>(&self.history_path, "normalized history")
    }

    /// Previously written normalized document, or an empty one
    pub fn load_history(&self) -> HistoryDocument {
        self.try_load_history().unwrap_or_else(HistoryDocument::empty)
    }

    pub fn save_raw(&self, records: &[RawRecord]) -> Result<(), SyncError> {
        write_atomic(&self.raw_path, "raw cache", records)?;
        debug!("Cache saved: raw history (saved {} items)", records.len());
        Ok(())
    }

    pub fn save_history(&self, document: &HistoryDocument) -> Result<(), SyncError> {
        write_atomic(&self.history_path, "normalized history", document)?;
        debug!("Normalized history saved ({} items)", document.count);
        Ok(())
    }
}

fn load_json<T: DeserializeOwned>(path: &Path, label: &str) -> Option<T> {
    if !path.exists() {
        debug!("Cache miss: {} (file does not exist)", label);
        return None;
    }
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {} at {}: {}", label, path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                "Corrupt {} at {}: {}. Treating as empty.",
                label,
                path.display(),
                e
            );
            None
        }
    }
}

/// Write to a sibling temp file, then rename over the target
fn write_atomic<T: Serialize + ?Sized>(
    path: &Path,
    what: &'static str,
    value: &T,
) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(value)
        .map_err(|source| SyncError::Serialize { what, source })?;

    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, json).map_err(|e| SyncError::io(&temp_path, e))?;
    std::fs::rename(&temp_path, path).map_err(|e| SyncError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use watch_sync_models::RecordKind;

    fn store_in(dir: &Path) -> HistoryStore {
        HistoryStore::for_user(&PathManager::with_base(dir), None)
    }

    #[test]
    fn missing_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.load_raw().is_none());
        assert_eq!(store.load_history(), HistoryDocument::empty());
        assert!(store.try_load_history().is_none());
    }

    #[test]
    fn corrupt_history_document_reads_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::create_dir_all(store.history_path().parent().unwrap()).unwrap();
        std::fs::write(store.history_path(), "{ corrupt").unwrap();

        assert!(store.try_load_history().is_none());
        assert_eq!(store.load_history(), HistoryDocument::empty());
    }

    #[test]
    fn corrupt_raw_cache_is_ignored_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        std::fs::create_dir_all(store.raw_path().parent().unwrap()).unwrap();
        std::fs::write(store.raw_path(), "{ not json").unwrap();

        assert!(store.load_raw().is_none());
        assert!(store.raw_path().exists());
    }

    #[test]
    fn raw_round_trip_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let mut record = RawRecord::new(RecordKind::Movie);
        record.watched_at = Some("2024-05-01T10:00:00.000Z".to_string());

        store.save_raw(&[record.clone()]).unwrap();
        assert_eq!(store.load_raw(), Some(vec![record]));
        assert!(!store.raw_path().with_extension("json.tmp").exists());
    }

    #[test]
    fn per_user_files_are_separate() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base(dir.path());
        let alice = HistoryStore::for_user(&paths, Some("alice"));
        let primary = HistoryStore::for_user(&paths, None);

        alice.save_raw(&[RawRecord::new(RecordKind::Episode)]).unwrap();
        assert!(primary.load_raw().is_none());
        assert_eq!(alice.load_raw().map(|r| r.len()), Some(1));
    }
}
