use tracing::trace;
use watch_sync_models::{ExternalId, RawRecord};
use watch_sync_sources::CatalogApi;
use crate::lookup_cache::LookupCache;

/// The catalog id of an episode's show: the embedded one, else the first
/// title-search hit
pub async fn resolve_show_id(
    record: &RawRecord,
    api: &dyn CatalogApi,
    cache: &mut LookupCache,
) -> Option<ExternalId> {
    if !record.is_episode() {
        return None;
    }
    if let Some(id) = record.show_ids().and_then(|ids| ids.trakt_id()) {
        return Some(id.clone());
    }
    let title = record.show_title()?.to_string();
    cache
        .search_shows(api, &title)
        .await
        .iter()
        .find_map(|hit| hit.show.as_ref()?.ids.trakt_id().cloned())
}

/// Fill missing genres and year from the show detail and attach the show's
/// rating. Existing values are never overwritten. Returns whether anything
/// was attached.
pub async fn enrich_episode(
    record: &mut RawRecord,
    show_id: Option<&ExternalId>,
    api: &dyn CatalogApi,
    cache: &mut LookupCache,
) -> bool {
    if !record.is_episode() {
        return false;
    }
    let embedded_rating = record.show.as_ref().and_then(|s| s.rating);
    let detail = match show_id {
        Some(id) => cache.show_detail(api, id).await.cloned(),
        None => None,
    };

    let mut applied = false;
    if let Some(detail) = &detail {
        if !record.has_genres() {
            if let Some(genres) = detail.genres.as_ref().filter(|g| !g.is_empty()) {
                record.genres = Some(genres.clone());
                applied = true;
            }
        }
        if !record.has_year() {
            if let Some(year) = detail.year {
                record.year = Some(year);
                applied = true;
            }
        }
    }

    let rating = detail.as_ref().and_then(|d| d.rating).or(embedded_rating);
    if let Some(rating) = rating {
        record.show_rating = Some(rating);
        applied = true;
    }

    trace!(
        "Enriched '{}': applied={}",
        record.show_title().unwrap_or("unknown"),
        applied
    );
    applied
}
