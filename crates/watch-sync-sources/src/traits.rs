use async_trait::async_trait;
use chrono::{DateTime, Utc};
use watch_sync_models::{
    EpisodeDetail, ExternalId, PeopleListing, RawRecord, RecordKind, SeasonListing, ShowDetail,
    ShowSearchResult,
};
use crate::error::SourceError;

/// Authenticated remote catalog used by a sync run
///
/// Every method is a single logical lookup. Callers decide whether a failure
/// is fatal (history) or just leaves a field unresolved (everything else).
#[async_trait]
pub trait CatalogApi: Send + Sync {
    fn source_name(&self) -> &str;

    /// Watch history, newest first, optionally bounded below by `start_at`
    /// (inclusive) and capped at `limit` records
    async fn fetch_history(
        &self,
        start_at: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<RawRecord>, SourceError>;

    /// Season list with embedded episodes for a show
    async fn show_seasons(&self, show_id: &ExternalId) -> Result<Vec<SeasonListing>, SourceError>;

    /// Full show detail (genres, year, rating)
    async fn show_detail(&self, show_id: &ExternalId) -> Result<ShowDetail, SourceError>;

    /// Text search over shows
    async fn search_shows(&self, title: &str) -> Result<Vec<ShowSearchResult>, SourceError>;

    /// Single episode by its own id
    async fn episode(&self, episode_id: &ExternalId) -> Result<EpisodeDetail, SourceError>;

    /// Cast listing for a movie (`RecordKind::Movie`) or a show (`RecordKind::Episode`)
    async fn people(&self, kind: RecordKind, id: &ExternalId) -> Result<PeopleListing, SourceError>;
}
