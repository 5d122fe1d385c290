use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use watch_sync_models::{NormalizedRecord, RawRecord, RecordKind};

/// Deduplication key for a watch event: what was watched, on which local day
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub kind: RecordKind,
    /// Catalog id in canonical string form, or the subject title when unidentified
    pub subject: String,
    /// `None` when the timestamp is missing or unparseable
    pub day: Option<NaiveDate>,
}

/// Anything that can be reduced to an [`IdentityKey`]
pub trait Keyed {
    fn identity_key_in<Tz: TimeZone>(&self, tz: &Tz) -> IdentityKey;

    fn identity_key(&self) -> IdentityKey {
        self.identity_key_in(&Local)
    }
}

fn local_day<Tz: TimeZone>(watched: Option<DateTime<Utc>>, tz: &Tz) -> Option<NaiveDate> {
    watched.map(|dt| dt.with_timezone(tz).date_naive())
}

impl Keyed for RawRecord {
    fn identity_key_in<Tz: TimeZone>(&self, tz: &Tz) -> IdentityKey {
        let subject = self
            .subject_ids()
            .and_then(|ids| ids.trakt_id())
            .map(|id| id.as_key())
            .or_else(|| self.subject_title().map(|t| t.trim().to_string()))
            .unwrap_or_default();

        IdentityKey {
            kind: self.kind,
            subject,
            day: local_day(self.watched_at_utc(), tz),
        }
    }
}

/// Day of a normalized `watched_at`, which is already local wall-clock time.
/// Unformatted values are the raw RFC 3339 string and get converted.
fn normalized_day<Tz: TimeZone>(watched_at: &str, tz: &Tz) -> Option<NaiveDate> {
    let watched_at = watched_at.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(watched_at, "%Y-%m-%d %H:%M") {
        return Some(dt.date());
    }
    let parsed = DateTime::parse_from_rfc3339(watched_at)
        .ok()
        .map(|dt| dt.with_timezone(&Utc));
    local_day(parsed, tz)
}

impl Keyed for NormalizedRecord {
    fn identity_key_in<Tz: TimeZone>(&self, tz: &Tz) -> IdentityKey {
        let subject = self
            .ids
            .as_ref()
            .and_then(|ids| ids.trakt_id())
            .map(|id| id.as_key())
            .or_else(|| self.title.as_deref().map(|t| t.trim().to_string()))
            .unwrap_or_default();

        IdentityKey {
            kind: self.kind,
            subject,
            day: self.watched_at.as_deref().and_then(|w| normalized_day(w, tz)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use watch_sync_models::{EpisodeDetail, MediaIds, MovieDetail};

    fn movie(id: u64, watched_at: &str) -> RawRecord {
        let mut record = RawRecord::new(RecordKind::Movie);
        record.watched_at = Some(watched_at.to_string());
        record.movie = Some(MovieDetail {
            title: Some("Heat".to_string()),
            ids: MediaIds::with_trakt(id),
            ..MovieDetail::default()
        });
        record
    }

    #[test]
    fn same_id_same_day_share_a_key() {
        let a = movie(42, "2024-05-01T08:00:00.000Z");
        let b = movie(42, "2024-05-01T20:00:00.000Z");
        assert_eq!(a.identity_key_in(&Utc), b.identity_key_in(&Utc));
    }

    #[test]
    fn day_boundary_follows_the_time_zone() {
        let a = movie(42, "2024-05-01T22:30:00Z");
        let b = movie(42, "2024-05-02T01:00:00Z");
        assert_ne!(a.identity_key_in(&Utc), b.identity_key_in(&Utc));

        let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(a.identity_key_in(&plus_three), b.identity_key_in(&plus_three));
    }

    #[test]
    fn numeric_and_string_ids_match() {
        let a = movie(42, "2024-05-01T08:00:00Z");
        let mut b = a.clone();
        b.movie.as_mut().unwrap().ids.trakt = Some(watch_sync_models::ExternalId::Text("42".to_string()));
        assert_eq!(a.identity_key_in(&Utc), b.identity_key_in(&Utc));
    }

    #[test]
    fn unidentified_record_falls_back_to_title() {
        let mut record = RawRecord::new(RecordKind::Episode);
        record.watched_at = Some("not a date".to_string());
        record.episode = Some(EpisodeDetail {
            title: Some(" Pilot ".to_string()),
            ..EpisodeDetail::default()
        });
        let key = record.identity_key_in(&Utc);
        assert_eq!(key.subject, "Pilot");
        assert_eq!(key.day, None);
    }

    #[test]
    fn kinds_never_collide() {
        let movie = movie(42, "2024-05-01T08:00:00Z");
        let mut episode = RawRecord::new(RecordKind::Episode);
        episode.watched_at = movie.watched_at.clone();
        episode.episode = Some(EpisodeDetail {
            ids: MediaIds::with_trakt(42),
            ..EpisodeDetail::default()
        });
        assert_ne!(movie.identity_key_in(&Utc), episode.identity_key_in(&Utc));
    }

    #[test]
    fn normalized_key_reads_formatted_day() {
        let record = NormalizedRecord {
            watched_at: Some("2024-05-01 23:59".to_string()),
            kind: RecordKind::Movie,
            title: Some("Heat".to_string()),
            season: None,
            number: None,
            ids: Some(MediaIds::with_trakt(42)),
            runtime: None,
            rating: None,
            show: None,
            genres: None,
            year: None,
            cast: Vec::new(),
            thumbnail: None,
        };
        let key = record.identity_key_in(&Utc);
        assert_eq!(key.subject, "42");
        assert_eq!(key.day, NaiveDate::from_ymd_opt(2024, 5, 1));
    }
}
