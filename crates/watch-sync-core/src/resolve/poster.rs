use watch_sync_models::{MediaIds, RawRecord};
use crate::lookup_cache::LookupCache;

const RPDB_BASE_URL: &str = "https://api.ratingposterdb.com";

/// Which id scheme a poster URL is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PosterSource {
    Imdb,
    Tmdb,
    Tvdb,
}

impl PosterSource {
    fn path(&self) -> &'static str {
        match self {
            PosterSource::Imdb => "imdb",
            PosterSource::Tmdb => "tmdb",
            PosterSource::Tvdb => "tvdb",
        }
    }
}

/// Builds RatingPosterDB URLs from external ids. No URL is ever fetched.
#[derive(Debug, Clone)]
pub struct PosterResolver {
    api_key: Option<String>,
}

impl PosterResolver {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Shows prefer tvdb, tmdb, imdb; movies prefer tmdb, imdb, tvdb
    pub fn poster_url(&self, ids: &MediaIds, series: bool) -> Option<String> {
        let key = self.api_key.as_deref()?;
        let order: [PosterSource; 3] = if series {
            [PosterSource::Tvdb, PosterSource::Tmdb, PosterSource::Imdb]
        } else {
            [PosterSource::Tmdb, PosterSource::Imdb, PosterSource::Tvdb]
        };

        order.iter().find_map(|source| {
            let media_id = match source {
                PosterSource::Imdb => ids.imdb_id()?,
                PosterSource::Tmdb => {
                    let prefix = if series { "series" } else { "movie" };
                    format!("{}-{}", prefix, ids.tmdb?)
                }
                PosterSource::Tvdb => ids.tvdb?.to_string(),
            };
            Some(format!(
                "{}/{}/{}/poster-default/{}.jpg?fallback=true",
                RPDB_BASE_URL,
                key,
                source.path(),
                media_id
            ))
        })
    }

    /// Thumbnail for a record: one it already has, then episode artwork, then
    /// a poster built from the show or movie ids (cached per show or movie),
    /// then one built from the episode's own ids
    pub fn resolve(&self, record: &RawRecord, cache: &mut LookupCache) -> Option<String> {
        if let Some(existing) = record.thumbnail.as_ref().filter(|t| !t.is_empty()) {
            return Some(existing.clone());
        }
        if let Some(image) = record.episode.as_ref().and_then(|e| e.image_url()) {
            return Some(image);
        }

        let series = record.is_episode();
        let owner_ids = if series {
            record.show_ids()
        } else {
            record.subject_ids()
        };

        if let Some(ids) = owner_ids.filter(|ids| ids.has_poster_id()) {
            let cache_key = ids.trakt_id().map(|id| {
                let scope = if series { "show" } else { "movie" };
                format!("{}:{}", scope, id.as_key())
            });
            if let Some(cached) = cache_key.as_deref().and_then(|k| cache.poster(k)) {
                return cached;
            }
            let url = self.poster_url(ids, series);
            if let Some(key) = cache_key {
                cache.remember_poster(key, url.clone());
            }
            return url;
        }

        if series {
            let episode_ids = record.episode.as_ref().map(|e| &e.ids)?;
            return self.poster_url(episode_ids, true);
        }
        None
    }
}
