use watch_sync_models::{ExternalId, RawRecord, RecordKind};
use watch_sync_sources::CatalogApi;
use crate::lookup_cache::LookupCache;

/// Top cast names for a record: the movie's cast, or the show's cast for an
/// episode. `None` when there is no id to look up.
pub async fn resolve_cast(
    record: &RawRecord,
    show_id: Option<&ExternalId>,
    limit: usize,
    api: &dyn CatalogApi,
    cache: &mut LookupCache,
) -> Option<Vec<String>> {
    let id = match record.kind {
        RecordKind::Movie => record.subject_ids()?.trakt_id()?.clone(),
        RecordKind::Episode => show_id?.clone(),
    };
    Some(cache.cast(api, record.kind, &id, limit).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{bare_episode, movie, FakeCatalog};
    use watch_sync_models::{CastMember, PeopleListing, Person};

    const WATCHED: &str = "2024-05-01T10:00:00.000Z";

    fn people(names: &[&str]) -> PeopleListing {
        PeopleListing {
            cast: names
                .iter()
                .map(|n| CastMember {
                    person: Some(Person {
                        name: Some(n.to_string()),
                    }),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn movie_cast_is_capped() {
        let mut api = FakeCatalog::new();
        api.people.insert("42".to_string(), people(&["a", "b", "c", "d", "e", "f", "g"]));
        let mut cache = LookupCache::new();

        let cast = resolve_cast(&movie(42, "Heat", WATCHED), None, 5, &api, &mut cache).await;
        assert_eq!(cast.map(|c| c.len()), Some(5));
    }

    #[tokio::test]
    async fn episodes_share_the_show_cast() {
        let mut api = FakeCatalog::new();
        api.people.insert("1388".to_string(), people(&["Bryan Cranston", "Aaron Paul"]));
        let mut cache = LookupCache::new();
        let show_id = ExternalId::Num(1388);

        for episode_id in [1, 2] {
            let record = bare_episode(episode_id, Some((1388, "Breaking Bad")), WATCHED);
            let cast = resolve_cast(&record, Some(&show_id), 5, &api, &mut cache).await;
            assert_eq!(cast, Some(vec!["Bryan Cranston".to_string(), "Aaron Paul".to_string()]));
        }
        assert_eq!(api.count("people:episode:1388"), 1);
    }

    #[tokio::test]
    async fn failure_yields_empty_list_once() {
        let api = FakeCatalog::new();
        let mut cache = LookupCache::new();
        let record = movie(7, "Lost Film", WATCHED);

        assert_eq!(resolve_cast(&record, None, 5, &api, &mut cache).await, Some(Vec::new()));
        assert_eq!(resolve_cast(&record, None, 5, &api, &mut cache).await, Some(Vec::new()));
        assert_eq!(api.count("people:"), 1);
    }

    #[tokio::test]
    async fn episode_without_show_id_is_skipped() {
        let api = FakeCatalog::new();
        let mut cache = LookupCache::new();
        let record = bare_episode(1, None, WATCHED);
        assert_eq!(resolve_cast(&record, None, 5, &api, &mut cache).await, None);
        assert_eq!(api.lookup_calls(), 0);
    }
}
