use super::*;
use chrono::Utc;
use watch_sync_models::{MediaIds, MovieDetail, RecordKind};

fn create_movie(id: u64, watched_at: &str, title: &str) -> RawRecord {
    let mut record = RawRecord::new(RecordKind::Movie);
    record.watched_at = Some(watched_at.to_string());
    record.movie = Some(MovieDetail {
        title: Some(title.to_string()),
        ids: MediaIds::with_trakt(id),
        ..MovieDetail::default()
    });
    record
}

fn create_normalized(id: u64, watched_at: &str, title: &str) -> NormalizedRecord {
    NormalizedRecord {
        watched_at: Some(watched_at.to_string()),
        kind: RecordKind::Movie,
        title: Some(title.to_string()),
        season: None,
        number: None,
        ids: Some(MediaIds::with_trakt(id)),
        runtime: None,
        rating: None,
        show: None,
        genres: None,
        year: None,
        cast: Vec::new(),
        thumbnail: None,
    }
}

#[test]
fn test_same_movie_same_day_keeps_one() {
    let new = vec![create_movie(42, "2024-05-01T08:00:00.000Z", "new copy")];
    let cached = vec![create_movie(42, "2024-05-01T20:00:00.000Z", "cached copy")];

    let merged = merge_raw_in(new, cached, &Utc);
    assert_eq!(merged.records.len(), 1);
    assert_eq!(merged.records[0].subject_title(), Some("new copy"));
    assert_eq!(merged.fresh.len(), 1);
}

#[test]
fn test_same_movie_different_days_keeps_both() {
    let new = vec![create_movie(42, "2024-05-02T08:00:00Z", "second viewing")];
    let cached = vec![create_movie(42, "2024-05-01T08:00:00Z", "first viewing")];

    let merged = merge_raw_in(new, cached, &Utc);
    assert_eq!(merged.records.len(), 2);
    assert_eq!(merged.records[0].subject_title(), Some("second viewing"));
}

#[test]
fn test_duplicates_within_fetch_are_removed() {
    let new = vec![
        create_movie(1, "2024-05-01T08:00:00Z", "a"),
        create_movie(1, "2024-05-01T09:00:00Z", "a again"),
        create_movie(2, "2024-05-01T09:00:00Z", "b"),
    ];
    let merged = merge_raw_in(new, Vec::new(), &Utc);
    assert_eq!(merged.fresh.len(), 2);
    assert_eq!(merged.records.len(), 2);
    assert_eq!(merged.records[0].subject_title(), Some("a"));
}

#[test]
fn test_dedup_keeps_first_in_order() {
    let items = vec![
        create_movie(3, "2024-05-03T08:00:00Z", "c"),
        create_movie(1, "2024-05-01T08:00:00Z", "a"),
        create_movie(3, "2024-05-03T10:00:00Z", "c dup"),
    ];
    let unique = dedup_by_identity_in(items, &Utc);
    let titles: Vec<_> = unique.iter().map(|r| r.subject_title().unwrap()).collect();
    assert_eq!(titles, vec!["c", "a"]);
}

#[test]
fn test_merge_normalized_new_wins() {
    let fresh = vec![create_normalized(42, "2024-05-01 10:00", "fresh")];
    let previous = vec![
        create_normalized(42, "2024-05-01 22:00", "stale"),
        create_normalized(7, "2024-04-30 22:00", "older"),
    ];

    let merged = merge_normalized_in(fresh, previous, &Utc);
    let titles: Vec<_> = merged.iter().map(|r| r.title.as_deref().unwrap()).collect();
    assert_eq!(titles, vec!["fresh", "older"]);
}

#[test]
fn test_merge_normalized_drops_duplicate_previous_entries() {
    let previous = vec![
        create_normalized(7, "2024-04-30 20:00", "older"),
        create_normalized(7, "2024-04-30 21:00", "older dup"),
    ];
    let merged = merge_normalized_in(Vec::new(), previous, &Utc);
    assert_eq!(merged.len(), 1);
}
