use serde::{Deserialize, Serialize};
use std::fmt;

/// An external identifier as the catalog hands it back.
///
/// Trakt ids are numeric, but cached files written by older tools sometimes
/// carry them as strings. Both forms deserialize, and comparisons go through
/// [`ExternalId::as_key`] so `42` and `"42"` are the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExternalId {
    Num(u64),
    Text(String),
}

impl ExternalId {
    /// Canonical string form used for hashing and comparison
    pub fn as_key(&self) -> String {
        match self {
            ExternalId::Num(n) => n.to_string(),
            ExternalId::Text(s) => s.trim().to_string(),
        }
    }

    /// Numeric value, if the id is (or parses as) a number
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            ExternalId::Num(n) => Some(*n),
            ExternalId::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, ExternalId::Text(s) if s.trim().is_empty())
    }
}

impl PartialEq for ExternalId {
    fn eq(&self, other: &Self) -> bool {
        self.as_key() == other.as_key()
    }
}

impl Eq for ExternalId {}

impl std::hash::Hash for ExternalId {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_key().hash(state);
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_key())
    }
}

impl From<u64> for ExternalId {
    fn from(id: u64) -> Self {
        ExternalId::Num(id)
    }
}

/// Identifier set attached to every movie, show and episode
///
/// Field names follow the catalog's `ids` object so records round-trip
/// through the raw cache unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MediaIds {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trakt: Option<ExternalId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvdb: Option<u64>,
}

impl MediaIds {
    pub fn with_trakt(id: u64) -> Self {
        Self {
            trakt: Some(ExternalId::Num(id)),
            ..Self::default()
        }
    }

    /// The catalog's own id, ignoring blank string ids
    pub fn trakt_id(&self) -> Option<&ExternalId> {
        self.trakt.as_ref().filter(|id| !id.is_blank())
    }

    /// IMDB id with the stray slashes Trakt sometimes includes removed
    pub fn imdb_id(&self) -> Option<String> {
        self.imdb
            .as_deref()
            .map(|s| s.replace('/', ""))
            .filter(|s| !s.trim().is_empty())
    }

    /// Check if all ID fields are empty
    pub fn is_empty(&self) -> bool {
        self.trakt_id().is_none()
            && self.slug.is_none()
            && self.imdb_id().is_none()
            && self.tmdb.is_none()
            && self.tvdb.is_none()
    }

    /// True when at least one id usable for artwork lookups is present
    pub fn has_poster_id(&self) -> bool {
        self.imdb_id().is_some() || self.tmdb.is_some() || self.tvdb.is_some()
    }
}
