// In-memory catalog used by the resolver and sync tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use watch_sync_models::{
    EpisodeDetail, ExternalId, MediaIds, MovieDetail, PeopleListing, RawRecord, RecordKind,
    SeasonListing, ShowDetail, ShowSearchResult,
};
use watch_sync_sources::{CatalogApi, SourceError};

#[derive(Default)]
pub struct FakeCatalog {
    pub history: Vec<RawRecord>,
    pub seasons: HashMap<String, Vec<SeasonListing>>,
    pub details: HashMap<String, ShowDetail>,
    /// Keyed by lowercase title
    pub searches: HashMap<String, Vec<ShowSearchResult>>,
    pub episodes: HashMap<String, EpisodeDetail>,
    pub people: HashMap<String, PeopleListing>,
    pub fail_history: bool,
    calls: Mutex<Vec<String>>,
    history_starts: Mutex<Vec<Option<DateTime<Utc>>>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls whose name starts with `prefix` (e.g. `"seasons:"`)
    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Every call except history fetches
    pub fn lookup_calls(&self) -> usize {
        self.calls().iter().filter(|c| !c.starts_with("history")).count()
    }

    pub fn history_starts(&self) -> Vec<Option<DateTime<Utc>>> {
        self.history_starts.lock().unwrap().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
        self.history_starts.lock().unwrap().clear();
    }
}

fn not_found(context: &str) -> SourceError {
    SourceError::status(404, context)
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn fetch_history(
        &self,
        start_at: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<RawRecord>, SourceError> {
        self.record("history".to_string());
        self.history_starts.lock().unwrap().push(start_at);
        if self.fail_history {
            return Err(SourceError::status(503, "Fetch watch history"));
        }
        let records = self
            .history
            .iter()
            .filter(|r| match (start_at, r.watched_at_utc()) {
                (Some(start), Some(watched)) => watched >= start,
                (Some(_), None) => false,
                (None, _) => true,
            })
            .take(limit.filter(|&n| n > 0).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(records)
    }

    async fn show_seasons(&self, show_id: &ExternalId) -> Result<Vec<SeasonListing>, SourceError> {
        self.record(format!("seasons:{}", show_id));
        self.seasons.get(&show_id.as_key()).cloned().ok_or_else(|| not_found("seasons"))
    }

    async fn show_detail(&self, show_id: &ExternalId) -> Result<ShowDetail, SourceError> {
        self.record(format!("detail:{}", show_id));
        self.details.get(&show_id.as_key()).cloned().ok_or_else(|| not_found("detail"))
    }

    async fn search_shows(&self, title: &str) -> Result<Vec<ShowSearchResult>, SourceError> {
        self.record(format!("search:{}", title));
        Ok(self.searches.get(&title.to_lowercase()).cloned().unwrap_or_default())
    }

    async fn episode(&self, episode_id: &ExternalId) -> Result<EpisodeDetail, SourceError> {
        self.record(format!("episode:{}", episode_id));
        self.episodes.get(&episode_id.as_key()).cloned().ok_or_else(|| not_found("episode"))
    }

    async fn people(&self, kind: RecordKind, id: &ExternalId) -> Result<PeopleListing, SourceError> {
        self.record(format!("people:{}:{}", kind.as_str(), id));
        self.people.get(&id.as_key()).cloned().ok_or_else(|| not_found("people"))
    }
}

pub fn movie(id: u64, title: &str, watched_at: &str) -> RawRecord {
    let mut record = RawRecord::new(RecordKind::Movie);
    record.watched_at = Some(watched_at.to_string());
    record.movie = Some(MovieDetail {
        title: Some(title.to_string()),
        ids: MediaIds::with_trakt(id),
        ..MovieDetail::default()
    });
    record
}

/// Episode record with the show attached but no season anywhere on it
pub fn bare_episode(episode_id: u64, show: Option<(u64, &str)>, watched_at: &str) -> RawRecord {
    let mut record = RawRecord::new(RecordKind::Episode);
    record.watched_at = Some(watched_at.to_string());
    record.episode = Some(EpisodeDetail {
        number: Some(1),
        title: Some(format!("Episode {}", episode_id)),
        ids: MediaIds::with_trakt(episode_id),
        ..EpisodeDetail::default()
    });
    record.show = show.map(|(id, title)| ShowDetail {
        title: Some(title.to_string()),
        ids: MediaIds::with_trakt(id),
        ..ShowDetail::default()
    });
    record
}

pub fn listing(season: u32, episode_ids: &[u64]) -> SeasonListing {
    SeasonListing {
        number: season,
        episodes: Some(
            episode_ids
                .iter()
                .map(|id| EpisodeDetail {
                    season: Some(season),
                    ids: MediaIds::with_trakt(*id),
                    title: Some(format!("Episode {}", id)),
                    ..EpisodeDetail::default()
                })
                .collect(),
        ),
    }
}

pub fn search_hit(show_id: u64, title: &str) -> ShowSearchResult {
    ShowSearchResult {
        score: Some(1000.0),
        show: Some(ShowDetail {
            title: Some(title.to_string()),
            ids: MediaIds::with_trakt(show_id),
            ..ShowDetail::default()
        }),
    }
}
