use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};
use watch_sync_models::{ExternalId, RecordKind, SeasonListing, ShowDetail, ShowSearchResult};
use watch_sync_sources::trakt::api::normalize_title_for_search;
use watch_sync_sources::{CatalogApi, SourceError};

/// Remote lookup accounting for one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LookupCounters {
    pub remote: usize,
    pub hits: usize,
    pub failures: usize,
}

/// Per-run memo of every catalog lookup the resolvers make.
///
/// Each id (or title) is looked up at most once per run. Failures are
/// memoized as "nothing found" so a broken show is not retried for every
/// one of its episodes. Nothing here outlives the run.
#[derive(Default)]
pub struct LookupCache {
    seasons: HashMap<ExternalId, Option<Vec<SeasonListing>>>,
    episode_seasons: HashMap<ExternalId, Option<u32>>,
    searches: HashMap<String, Vec<ShowSearchResult>>,
    show_details: HashMap<ExternalId, Option<ShowDetail>>,
    casts: HashMap<(RecordKind, ExternalId), Vec<String>>,
    posters: HashMap<String, Option<String>>,
    counters: LookupCounters,
}

impl LookupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counters(&self) -> LookupCounters {
        self.counters
    }

    fn miss(&mut self) {
        self.counters.remote += 1;
    }

    fn hit(&mut self) {
        self.counters.hits += 1;
    }

    fn failed(&mut self, what: &str, key: &str, error: &SourceError) {
        self.counters.failures += 1;
        if error.is_not_found() {
            debug!("{} lookup for {}: not found", what, key);
        } else {
            warn!("{} lookup for {} failed: {}", what, key, error);
        }
    }

    /// Season listing (with episodes) of a show
    pub async fn show_seasons(
        &mut self,
        api: &dyn CatalogApi,
        show_id: &ExternalId,
    ) -> Option<&[SeasonListing]> {
        if self.seasons.contains_key(show_id) {
            self.hit();
        } else {
            self.miss();
            let listing = match api.show_seasons(show_id).await {
                Ok(seasons) => Some(seasons),
                Err(e) => {
                    self.failed("Season listing", &show_id.as_key(), &e);
                    None
                }
            };
            self.seasons.insert(show_id.clone(), listing);
        }
        self.seasons.get(show_id).and_then(|s| s.as_deref())
    }

    /// Season number reported by the single-episode endpoint
    pub async fn episode_season(&mut self, api: &dyn CatalogApi, episode_id: &ExternalId) -> Option<u32> {
        if let Some(season) = self.episode_seasons.get(episode_id) {
            self.counters.hits += 1;
            return *season;
        }
        self.miss();
        let season = match api.episode(episode_id).await {
            Ok(episode) => episode.season,
            Err(e) => {
                self.failed("Episode", &episode_id.as_key(), &e);
                None
            }
        };
        self.episode_seasons.insert(episode_id.clone(), season);
        season
    }

    /// Show search results for a title, keyed case-insensitively
    pub async fn search_shows(&mut self, api: &dyn CatalogApi, title: &str) -> &[ShowSearchResult] {
        let key = normalize_title_for_search(title).to_lowercase();
        if self.searches.contains_key(&key) {
            self.hit();
        } else {
            self.miss();
            let results = match api.search_shows(title).await {
                Ok(results) => results,
                Err(e) => {
                    self.failed("Show search", title, &e);
                    Vec::new()
                }
            };
            self.searches.insert(key.clone(), results);
        }
        self.searches.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub async fn show_detail(&mut self, api: &dyn CatalogApi, show_id: &ExternalId) -> Option<&ShowDetail> {
        if self.show_details.contains_key(show_id) {
            self.hit();
        } else {
            self.miss();
            let detail = match api.show_detail(show_id).await {
                Ok(detail) => Some(detail),
                Err(e) => {
                    self.failed("Show detail", &show_id.as_key(), &e);
                    None
                }
            };
            self.show_details.insert(show_id.clone(), detail);
        }
        self.show_details.get(show_id).and_then(Option::as_ref)
    }

    /// Top `limit` cast names; an empty list when the lookup fails
    pub async fn cast(
        &mut self,
        api: &dyn CatalogApi,
        kind: RecordKind,
        id: &ExternalId,
        limit: usize,
    ) -> Vec<String> {
        let key = (kind, id.clone());
        if let Some(names) = self.casts.get(&key) {
            self.counters.hits += 1;
            return names.clone();
        }
        self.miss();
        let names = match api.people(kind, id).await {
            Ok(listing) => listing.top_names(limit),
            Err(e) => {
                self.failed("Cast", &id.as_key(), &e);
                Vec::new()
            }
        };
        self.casts.insert(key, names.clone());
        names
    }

    /// Previously computed poster for a cache key (`Some(None)` = known to have none)
    pub fn poster(&mut self, key: &str) -> Option<Option<String>> {
        let cached = self.posters.get(key).cloned();
        if cached.is_some() {
            self.hit();
        }
        cached
    }

    pub fn remember_poster(&mut self, key: String, url: Option<String>) {
        self.posters.insert(key, url);
    }
}
