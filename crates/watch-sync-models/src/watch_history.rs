use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::media::{EpisodeDetail, MovieDetail, RecordKind, ShowDetail};
use crate::media_ids::MediaIds;

/// One watch event as returned by the catalog's history endpoint
///
/// The fetched shape is never edited in place. Resolvers work on a copy and
/// only attach the fields below the `resolver output` marker before the
/// record is normalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawRecord {
    /// History event id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<MovieDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<ShowDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<EpisodeDetail>,

    /// Flattened fallbacks written by older exporters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ids: Option<MediaIds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_show_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_season: Option<u32>,

    // resolver output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawRecord {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            id: None,
            kind,
            watched_at: None,
            action: None,
            movie: None,
            show: None,
            episode: None,
            ids: None,
            title: None,
            season: None,
            extracted_show_title: None,
            extracted_season: None,
            resolved_season: None,
            show_rating: None,
            genres: None,
            year: None,
            thumbnail: None,
            cast: None,
            extra: Map::new(),
        }
    }

    pub fn is_episode(&self) -> bool {
        self.kind == RecordKind::Episode
    }

    /// Parsed watched timestamp, `None` when absent or unparseable
    pub fn watched_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.watched_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Ids of the watched subject: the movie, or the episode itself
    pub fn subject_ids(&self) -> Option<&MediaIds> {
        let embedded = match self.kind {
            RecordKind::Movie => self.movie.as_ref().map(|m| &m.ids),
            RecordKind::Episode => self.episode.as_ref().map(|e| &e.ids),
        };
        embedded.filter(|ids| !ids.is_empty()).or(self.ids.as_ref())
    }

    /// Title of the watched subject (movie title or episode title)
    pub fn subject_title(&self) -> Option<&str> {
        let embedded = match self.kind {
            RecordKind::Movie => self.movie.as_ref().and_then(|m| m.title.as_deref()),
            RecordKind::Episode => self.episode.as_ref().and_then(|e| e.title.as_deref()),
        };
        embedded.or(self.title.as_deref())
    }

    pub fn show_ids(&self) -> Option<&MediaIds> {
        self.show.as_ref().map(|s| &s.ids)
    }

    pub fn show_title(&self) -> Option<&str> {
        self.show
            .as_ref()
            .and_then(|s| s.title.as_deref())
            .or(self.extracted_show_title.as_deref())
            .filter(|t| !t.trim().is_empty())
    }

    /// A season number already carried by the record, if any
    pub fn embedded_season(&self) -> Option<u32> {
        self.extracted_season.or(self.season)
    }

    pub fn first_aired(&self) -> Option<&str> {
        self.episode.as_ref().and_then(|e| e.first_aired.as_deref())
    }

    /// Genres already carried by the record or its embedded subject
    pub fn has_genres(&self) -> bool {
        let embedded = match self.kind {
            RecordKind::Movie => self.movie.as_ref().and_then(|m| m.genres.as_ref()),
            RecordKind::Episode => self.show.as_ref().and_then(|s| s.genres.as_ref()),
        };
        embedded
            .or(self.genres.as_ref())
            .map(|g| !g.is_empty())
            .unwrap_or(false)
    }

    pub fn has_year(&self) -> bool {
        let embedded = match self.kind {
            RecordKind::Movie => self.movie.as_ref().and_then(|m| m.year),
            RecordKind::Episode => self.show.as_ref().and_then(|s| s.year),
        };
        embedded.or(self.year).is_some()
    }
}
