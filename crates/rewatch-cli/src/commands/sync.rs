use super::config::data_paths;
use super::sync_ui::SyncUI;
use crate::output::{Output, OutputFormat};
use chrono::Utc;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use watch_sync_config::{Config, CredentialStore, PathManager};
use watch_sync_core::{HistoryStore, PosterResolver, SyncOptions, SyncOrchestrator, SyncOutcome};
use watch_sync_sources::TraktClient;

pub struct SyncArgs {
    pub limit: Option<usize>,
    pub no_images: bool,
    pub no_cast: bool,
    pub no_enrichment: bool,
    pub force: bool,
    pub user: Option<String>,
}

impl SyncArgs {
    pub fn to_options(&self, config: &Config) -> SyncOptions {
        SyncOptions {
            limit: self.limit.filter(|&n| n > 0),
            resolve_images: !self.no_images,
            resolve_cast: !self.no_cast,
            enrich: !self.no_enrichment,
            force_full_sync: self.force,
            cast_limit: config.sync.cast_limit,
        }
    }
}

pub async fn run_sync(args: SyncArgs, config: &Config, paths: &PathManager, output: &Output) -> Result<()> {
    tracing::debug!("Sync command started");

    config
        .validate()
        .map_err(|e| eyre!("Configuration validation failed: {}", e))?;

    let credentials_file = paths.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

    let client = TraktClient::from_config(config, &cred_store, Utc::now())
        .map_err(|e| eyre!("{}", e))?;

    let data_paths = data_paths(config, paths);
    let store = HistoryStore::for_user(&data_paths, config.file_user(args.user.as_deref()));
    tracing::debug!(
        "Using raw cache {} and history file {}",
        store.raw_path().display(),
        store.history_path().display()
    );

    let options = args.to_options(config);
    let posters = PosterResolver::new(config.rpdb_api_key().map(str::to_string));
    if options.resolve_images && !posters.is_enabled() {
        tracing::info!("No RPDB API key configured; posters will come from episode artwork only");
    }

    let orchestrator = SyncOrchestrator::new(Box::new(client), store)
        .with_sync_options(options)
        .with_posters(posters);

    let ui = SyncUI::new(output.is_quiet() || output.format() != OutputFormat::Human);
    let result = orchestrator.sync_with_observer(&ui).await;
    ui.finish();
    let result = match result {
        Ok(result) => result,
        Err(e) => {
            if output.format() != OutputFormat::Human {
                output.error(e.to_string());
            }
            return Err(eyre!("Sync operation failed: {}", e));
        }
    };

    match output.format() {
        OutputFormat::Human => match &result.outcome {
            SyncOutcome::UpToDate { cached } => {
                output.success(format!("Already up to date ({} records)", cached));
            }
            SyncOutcome::Written {
                new_records,
                normalized_count,
                ..
            } => {
                output.success(format!(
                    "Sync completed: {} new records, {} total in {:.2}s",
                    new_records, normalized_count, result.duration_secs
                ));
                let unresolved = result.stats.seasons.unresolved();
                if unresolved > 0 {
                    output.warn(format!("{} episodes have no resolved season", unresolved));
                }
            }
        },
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let mut value = serde_json::to_value(&result).unwrap_or_else(|_| json!({}));
            if let Some(object) = value.as_object_mut() {
                object.insert("success".to_string(), json!(true));
            }
            output.json(&value);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_options() {
        let mut config = Config::default();
        config.sync.cast_limit = 3;
        let args = SyncArgs {
            limit: Some(20),
            no_images: true,
            no_cast: false,
            no_enrichment: true,
            force: true,
            user: None,
        };

        let options = args.to_options(&config);
        assert_eq!(options.limit, Some(20));
        assert!(!options.resolve_images);
        assert!(options.resolve_cast);
        assert!(!options.enrich);
        assert!(options.force_full_sync);
        assert_eq!(options.cast_limit, 3);
    }

    #[test]
    fn zero_limit_means_unlimited() {
        let args = SyncArgs {
            limit: Some(0),
            no_images: false,
            no_cast: false,
            no_enrichment: false,
            force: false,
            user: None,
        };
        assert_eq!(args.to_options(&Config::default()).limit, None);
    }
}
