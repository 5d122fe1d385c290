use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use watch_sync_models::{
    EpisodeDetail, ExternalId, PeopleListing, RawRecord, RecordKind, SeasonListing, ShowDetail,
    ShowSearchResult,
};
use crate::error::SourceError;

/// Connection details shared by every request
pub struct Endpoint<'a> {
    pub base_url: &'a str,
    pub client_id: &'a str,
    pub access_token: Option<&'a str>,
}

impl Endpoint<'_> {
    fn get(&self, client: &Client, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        let request = client
            .get(url)
            .header("trakt-api-version", "2")
            .header("trakt-api-key", self.client_id)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");
        match self.access_token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }
}

async fn check_status(response: Response, context: &str) -> Result<Response, SourceError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        debug!("{} failed: HTTP {} - {}", context, status, error_text);
        return Err(SourceError::status(status.as_u16(), context));
    }
    Ok(response)
}

async fn get_json<T: DeserializeOwned>(
    client: &Client,
    endpoint: &Endpoint<'_>,
    path: &str,
    context: &str,
) -> Result<T, SourceError> {
    let response = endpoint.get(client, path).send().await?;
    let response = check_status(response, context).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| SourceError::decode(context, e))
}

/// Removes commas and normalizes whitespace to improve search matching
pub fn normalize_title_for_search(title: &str) -> String {
    title
        .replace(',', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Query path for one page of `sync/history`
pub fn history_path(start_at: Option<DateTime<Utc>>, page: u32, page_size: u32) -> String {
    let mut path = format!("sync/history?extended=full&page={}&limit={}", page, page_size);
    if let Some(start_at) = start_at {
        let stamp = start_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        path.push_str(&format!("&start_at={}", urlencoding::encode(&stamp)));
    }
    path
}

/// Convert one history item into a raw record, copying the show title and
/// season into the extraction fields the season resolver reads first
pub fn history_item_to_record(item: serde_json::Value) -> Result<RawRecord, serde_json::Error> {
    let mut record: RawRecord = serde_json::from_value(item)?;
    if record.is_episode() {
        if record.extracted_show_title.is_none() {
            record.extracted_show_title = record.show.as_ref().and_then(|s| s.title.clone());
        }
        if record.extracted_season.is_none() {
            record.extracted_season = record.episode.as_ref().and_then(|e| e.season);
        }
    }
    Ok(record)
}

/// A limit of zero means no limit
pub fn limit_reached(count: usize, limit: Option<usize>) -> bool {
    matches!(limit, Some(limit) if limit > 0 && count >= limit)
}

/// Fetch watch history with pagination
pub async fn get_history(
    client: &Client,
    endpoint: &Endpoint<'_>,
    start_at: Option<DateTime<Utc>>,
    page_size: u32,
    limit: Option<usize>,
) -> Result<Vec<RawRecord>, SourceError> {
    let mut all_history = Vec::new();
    let mut page = 1;
    let mut skipped = 0;

    loop {
        let path = history_path(start_at, page, page_size);
        let response = endpoint.get(client, &path).send().await?;
        let response = check_status(response, "Fetch watch history").await?;

        let total_pages: u32 = response
            .headers()
            .get("X-Pagination-Page-Count")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(1);

        let items: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| SourceError::decode("watch history page", e))?;
        let items_on_page = items.len();

        for item in items {
            if limit_reached(all_history.len(), limit) {
                debug!("History limit reached: {} items", all_history.len());
                return Ok(all_history);
            }
            match history_item_to_record(item) {
                Ok(record) => all_history.push(record),
                Err(e) => {
                    skipped += 1;
                    if skipped <= 5 {
                        debug!("Trakt watch history: skipping unrecognised item: {}", e);
                    }
                }
            }
        }

        debug!(
            "Trakt history: page={}, total_pages={}, items_on_page={}",
            page, total_pages, items_on_page
        );

        if page >= total_pages || items_on_page == 0 || limit_reached(all_history.len(), limit) {
            break;
        }
        page += 1;
    }

    if skipped > 0 {
        warn!("Skipped {} history items that could not be parsed", skipped);
    }
    debug!("Fetched Trakt watch history: total_items={}", all_history.len());

    Ok(all_history)
}

pub async fn get_show_seasons(
    client: &Client,
    endpoint: &Endpoint<'_>,
    show_id: &ExternalId,
) -> Result<Vec<SeasonListing>, SourceError> {
    let path = format!("shows/{}/seasons?extended=episodes", show_id.as_key());
    get_json(client, endpoint, &path, "Fetch show seasons").await
}

pub async fn get_show_detail(
    client: &Client,
    endpoint: &Endpoint<'_>,
    show_id: &ExternalId,
) -> Result<ShowDetail, SourceError> {
    let path = format!("shows/{}?extended=full", show_id.as_key());
    get_json(client, endpoint, &path, "Fetch show detail").await
}

/// Search shows by title using the text query endpoint: GET /search/show?query={query}
pub async fn search_shows(
    client: &Client,
    endpoint: &Endpoint<'_>,
    title: &str,
) -> Result<Vec<ShowSearchResult>, SourceError> {
    let normalized_title = normalize_title_for_search(title);
    let path = format!("search/show?query={}", urlencoding::encode(&normalized_title));
    get_json(client, endpoint, &path, "Search shows").await
}

pub async fn get_episode(
    client: &Client,
    endpoint: &Endpoint<'_>,
    episode_id: &ExternalId,
) -> Result<EpisodeDetail, SourceError> {
    let path = format!("episodes/{}?extended=full", episode_id.as_key());
    get_json(client, endpoint, &path, "Fetch episode").await
}

pub async fn get_people(
    client: &Client,
    endpoint: &Endpoint<'_>,
    kind: RecordKind,
    id: &ExternalId,
) -> Result<PeopleListing, SourceError> {
    let collection = match kind {
        RecordKind::Movie => "movies",
        RecordKind::Episode => "shows",
    };
    let path = format!("{}/{}/people", collection, id.as_key());
    get_json(client, endpoint, &path, "Fetch cast").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn history_path_without_cutoff() {
        assert_eq!(history_path(None, 2, 100), "sync/history?extended=full&page=2&limit=100");
    }

    #[test]
    fn history_path_encodes_cutoff() {
        let cutoff = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 1).unwrap();
        let path = history_path(Some(cutoff), 1, 50);
        assert!(path.ends_with("&start_at=2024-05-01T10%3A00%3A01Z"), "{}", path);
    }

    #[test]
    fn zero_limit_never_stops_the_fetch() {
        assert!(!limit_reached(0, Some(0)));
        assert!(!limit_reached(500, Some(0)));
        assert!(!limit_reached(500, None));
    }

    #[test]
    fn limit_is_checked_before_taking_another_item() {
        assert!(!limit_reached(0, Some(1)));
        assert!(limit_reached(1, Some(1)));
        assert!(!limit_reached(2, Some(3)));
    }

    #[test]
    fn search_title_is_normalized() {
        assert_eq!(normalize_title_for_search("Love,  Death & Robots"), "Love Death & Robots");
    }

    #[test]
    fn episode_item_gets_extraction_fields() {
        let record = history_item_to_record(json!({
            "id": 7,
            "type": "episode",
            "watched_at": "2024-05-01T10:00:00.000Z",
            "episode": {"season": 4, "number": 1, "title": "x", "ids": {"trakt": 9}},
            "show": {"title": "Fargo", "ids": {"trakt": 60203}}
        }))
        .unwrap();
        assert_eq!(record.extracted_show_title.as_deref(), Some("Fargo"));
        assert_eq!(record.extracted_season, Some(4));
    }

    #[test]
    fn movie_item_has_no_extraction_fields() {
        let record = history_item_to_record(json!({
            "type": "movie",
            "movie": {"title": "Heat", "ids": {"trakt": 42}}
        }))
        .unwrap();
        assert!(record.extracted_season.is_none());
        assert!(record.extracted_show_title.is_none());
    }
}
