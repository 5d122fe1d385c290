use super::config::data_paths;
use crate::output::{Output, OutputFormat};
use color_eyre::Result;
use serde_json::json;
use watch_sync_config::{Config, PathManager};
use watch_sync_core::HistoryStore;

/// Read-only summary of the persisted raw cache and normalized history
pub fn run_status(user: Option<&str>, config: &Config, paths: &PathManager, output: &Output) -> Result<()> {
    let data_paths = data_paths(config, paths);
    let store = HistoryStore::for_user(&data_paths, config.file_user(user));

    let raw_count = store.load_raw().map(|records| records.len());
    let history = store.load_history();

    match output.format() {
        OutputFormat::Human => {
            output.info(format!("User: {}", user.unwrap_or("(primary)")));
            match raw_count {
                Some(count) => output.info(format!("Raw cache: {} records ({})", count, store.raw_path().display())),
                None => output.warn(format!("Raw cache: none ({})", store.raw_path().display())),
            }
            output.info(format!(
                "Normalized history: {} records ({})",
                history.count,
                store.history_path().display()
            ));
            match &history.generated_at {
                Some(generated_at) => output.info(format!(
                    "Last written: {} (took {:.2}s)",
                    generated_at, history.generation_time
                )),
                None => output.warn("History has never been written; run `rewatch sync`"),
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "user": user,
                "raw_path": store.raw_path(),
                "raw_count": raw_count,
                "history_path": store.history_path(),
                "normalized_count": history.count,
                "generated_at": history.generated_at,
                "generation_time": history.generation_time,
            }));
        }
    }
    Ok(())
}
