use chrono::{Local, TimeZone};
use watch_sync_models::{NormalizedRecord, RawRecord, RecordKind, ShowRef};

/// Season shown for episodes nothing could place
pub const DEFAULT_SEASON: u32 = 1;

pub fn round_rating(rating: f64) -> f64 {
    (rating * 10.0).round() / 10.0
}

/// `YYYY-MM-DD HH:MM` in `tz`; unparseable values pass through unchanged
pub fn format_watched_in<Tz>(record: &RawRecord, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match record.watched_at_utc() {
        Some(dt) => Some(dt.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string()),
        None => record.watched_at.clone(),
    }
}

pub fn normalize(record: &RawRecord) -> NormalizedRecord {
    normalize_in(record, &Local)
}

pub fn normalize_in<Tz>(record: &RawRecord, tz: &Tz) -> NormalizedRecord
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let watched_at = format_watched_in(record, tz);
    let cast = record.cast.clone().unwrap_or_default();
    let thumbnail = record.thumbnail.clone().filter(|t| !t.is_empty());

    match record.kind {
        RecordKind::Movie => {
            let movie = record.movie.as_ref();
            NormalizedRecord {
                watched_at,
                kind: RecordKind::Movie,
                title: record.subject_title().map(str::to_string),
                season: None,
                number: None,
                ids: record.subject_ids().cloned(),
                runtime: movie.and_then(|m| m.runtime),
                rating: movie.and_then(|m| m.rating).map(round_rating),
                show: None,
                genres: movie.and_then(|m| m.genres.clone()).or_else(|| record.genres.clone()),
                year: movie.and_then(|m| m.year).or(record.year),
                cast,
                thumbnail,
            }
        }
        RecordKind::Episode => {
            let episode = record.episode.as_ref();
            let show = record.show.as_ref();
            let season = record
                .resolved_season
                .or(record.extracted_season)
                .or_else(|| episode.and_then(|e| e.season))
                .or(record.season)
                .unwrap_or(DEFAULT_SEASON);
            // The show's aggregate rating replaces the per-episode one
            let rating = record
                .show_rating
                .or_else(|| episode.and_then(|e| e.rating))
                .map(round_rating);

            NormalizedRecord {
                watched_at,
                kind: RecordKind::Episode,
                title: record.subject_title().map(str::to_string),
                season: Some(season),
                number: episode.and_then(|e| e.number),
                ids: record.subject_ids().cloned(),
                runtime: episode.and_then(|e| e.runtime),
                rating,
                show: Some(ShowRef {
                    title: record.show_title().map(str::to_string),
                }),
                genres: show.and_then(|s| s.genres.clone()).or_else(|| record.genres.clone()),
                year: show.and_then(|s| s.year).or(record.year),
                cast,
                thumbnail,
            }
        }
    }
}
