use tracing::{debug, trace};
use watch_sync_models::{EpisodeDetail, ExternalId, RawRecord, SeasonListing};
use watch_sync_sources::CatalogApi;
use crate::lookup_cache::LookupCache;

/// One way of finding the season an episode belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeasonStrategy {
    /// Season already on the record
    Embedded,
    /// Scan the season listing of the record's show id
    ShowListing,
    /// Search the show by title and scan each candidate's listing
    TitleSearch,
    /// Ask the single-episode endpoint
    EpisodeLookup,
}

/// Tried in this order; the first one that yields a season wins
pub const SEASON_CHAIN: [SeasonStrategy; 4] = [
    SeasonStrategy::Embedded,
    SeasonStrategy::ShowListing,
    SeasonStrategy::TitleSearch,
    SeasonStrategy::EpisodeLookup,
];

impl SeasonStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonStrategy::Embedded => "embedded",
            SeasonStrategy::ShowListing => "show_listing",
            SeasonStrategy::TitleSearch => "title_search",
            SeasonStrategy::EpisodeLookup => "episode_lookup",
        }
    }

    pub async fn attempt(
        self,
        record: &RawRecord,
        api: &dyn CatalogApi,
        cache: &mut LookupCache,
    ) -> Option<u32> {
        match self {
            SeasonStrategy::Embedded => record.embedded_season(),
            SeasonStrategy::ShowListing => {
                let show_id = show_id(record)?;
                let episode_id = episode_id(record)?;
                let seasons = cache.show_seasons(api, &show_id).await?;
                season_containing(seasons, |ep| ep.ids.trakt_id() == Some(&episode_id))
            }
            SeasonStrategy::TitleSearch => {
                // Only reached by records that do not know their show
                if show_id(record).is_some() {
                    return None;
                }
                let title = record.show_title()?.to_string();
                search_candidates(record, &title, api, cache).await
            }
            SeasonStrategy::EpisodeLookup => {
                let episode_id = episode_id(record)?;
                cache.episode_season(api, &episode_id).await
            }
        }
    }
}

fn show_id(record: &RawRecord) -> Option<ExternalId> {
    record.show_ids().and_then(|ids| ids.trakt_id()).cloned()
}

fn episode_id(record: &RawRecord) -> Option<ExternalId> {
    record
        .episode
        .as_ref()
        .and_then(|e| e.ids.trakt_id())
        .or_else(|| record.ids.as_ref().and_then(|ids| ids.trakt_id()))
        .cloned()
}

fn season_containing<F>(seasons: &[SeasonListing], matches: F) -> Option<u32>
where
    F: Fn(&EpisodeDetail) -> bool,
{
    seasons.iter().find_map(|season| {
        season
            .episodes
            .as_deref()?
            .iter()
            .find(|ep| matches(ep))
            .map(|ep| ep.season.unwrap_or(season.number))
    })
}

/// First candidate whose listing contains the episode, matched by id, then
/// by title, then by air date
async fn search_candidates(
    record: &RawRecord,
    title: &str,
    api: &dyn CatalogApi,
    cache: &mut LookupCache,
) -> Option<u32> {
    let candidates: Vec<ExternalId> = cache
        .search_shows(api, title)
        .await
        .iter()
        .filter_map(|hit| hit.show.as_ref()?.ids.trakt_id().cloned())
        .collect();
    trace!("Season search for '{}': {} candidates", title, candidates.len());

    let wanted_id = episode_id(record);
    let wanted_title = record
        .episode
        .as_ref()
        .and_then(|e| e.title.as_deref())
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());
    let wanted_aired = record.first_aired().map(str::to_string);

    for candidate in candidates {
        let Some(seasons) = cache.show_seasons(api, &candidate).await else {
            continue;
        };
        let by_id = wanted_id.as_ref().and_then(|id| {
            season_containing(seasons, |ep| ep.ids.trakt_id() == Some(id))
        });
        let by_title = || {
            wanted_title.as_ref().and_then(|t| {
                season_containing(seasons, |ep| {
                    ep.title.as_deref().map(|et| et.trim().to_lowercase()).as_ref() == Some(t)
                })
            })
        };
        let by_aired = || {
            wanted_aired.as_ref().and_then(|aired| {
                season_containing(seasons, |ep| ep.first_aired.as_ref() == Some(aired))
            })
        };
        if let Some(season) = by_id.or_else(by_title).or_else(by_aired) {
            debug!("Season {} for '{}' found via show {}", season, title, candidate);
            return Some(season);
        }
    }
    None
}

/// Season of an episode record and the strategy that produced it
pub async fn resolve_season(
    record: &RawRecord,
    api: &dyn CatalogApi,
    cache: &mut LookupCache,
) -> Option<(u32, SeasonStrategy)> {
    if !record.is_episode() {
        return None;
    }
    for strategy in SEASON_CHAIN {
        if let Some(season) = strategy.attempt(record, api, cache).await {
            return Some((season, strategy));
        }
    }
    debug!(
        "No season found for episode '{}'",
        record.subject_title().unwrap_or("unknown")
    );
    None
}
