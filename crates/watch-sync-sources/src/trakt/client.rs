use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use watch_sync_config::{Config, CredentialStore};
use watch_sync_models::{
    EpisodeDetail, ExternalId, PeopleListing, RawRecord, RecordKind, SeasonListing, ShowDetail,
    ShowSearchResult,
};
use crate::error::SourceError;
use crate::traits::CatalogApi;
use crate::trakt::api::{self, Endpoint};
use crate::trakt::auth;

#[derive(Clone)]
pub struct TraktClient {
    client: Arc<Client>,
    base_url: String,
    client_id: String,
    access_token: Option<String>,
    page_size: u32,
}

impl TraktClient {
    pub fn new(client_id: String, base_url: String, timeout: Duration) -> Self {
        Self {
            client: Arc::new(auth::create_trakt_client(timeout)),
            base_url,
            client_id,
            access_token: None,
            page_size: 100,
        }
    }

    /// Client configured from `[trakt]`/`[sync]` with the stored access token
    pub fn from_config(
        config: &Config,
        credentials: &CredentialStore,
        now: DateTime<Utc>,
    ) -> Result<Self, SourceError> {
        let token = auth::stored_access_token(credentials, now)?;
        let client = Self::new(
            config.trakt.client_id.clone(),
            config.trakt.api_url.clone(),
            Duration::from_secs(config.sync.request_timeout_secs),
        )
        .with_access_token(token)
        .with_page_size(config.sync.page_size);
        info!("Using saved Trakt access token");
        Ok(client)
    }

    pub fn with_access_token(mut self, token: String) -> Self {
        self.access_token = Some(token);
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    fn endpoint(&self) -> Endpoint<'_> {
        Endpoint {
            base_url: &self.base_url,
            client_id: &self.client_id,
            access_token: self.access_token.as_deref(),
        }
    }
}

#[async_trait]
impl CatalogApi for TraktClient {
    fn source_name(&self) -> &str {
        "trakt"
    }

    async fn fetch_history(
        &self,
        start_at: Option<DateTime<Utc>>,
        limit: Option<usize>,
    ) -> Result<Vec<RawRecord>, SourceError> {
        if !self.is_authenticated() {
            return Err(SourceError::NotAuthenticated("history requires an access token".to_string()));
        }
        api::get_history(&self.client, &self.endpoint(), start_at, self.page_size, limit).await
    }

    async fn show_seasons(&self, show_id: &ExternalId) -> Result<Vec<SeasonListing>, SourceError> {
        api::get_show_seasons(&self.client, &self.endpoint(), show_id).await
    }

    async fn show_detail(&self, show_id: &ExternalId) -> Result<ShowDetail, SourceError> {
        api::get_show_detail(&self.client, &self.endpoint(), show_id).await
    }

    async fn search_shows(&self, title: &str) -> Result<Vec<ShowSearchResult>, SourceError> {
        api::search_shows(&self.client, &self.endpoint(), title).await
    }

    async fn episode(&self, episode_id: &ExternalId) -> Result<EpisodeDetail, SourceError> {
        api::get_episode(&self.client, &self.endpoint(), episode_id).await
    }

    async fn people(&self, kind: RecordKind, id: &ExternalId) -> Result<PeopleListing, SourceError> {
        api::get_people(&self.client, &self.endpoint(), kind, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn from_config_requires_a_token() {
        let config = Config::default();
        let credentials = CredentialStore::new(PathBuf::from("/nonexistent/credentials.toml"));
        let result = TraktClient::from_config(&config, &credentials, Utc::now());
        assert!(matches!(result, Err(SourceError::NotAuthenticated(_))));
    }

    #[test]
    fn from_config_applies_sync_settings() {
        let mut config = Config::default();
        config.trakt.client_id = "cid".to_string();
        config.sync.page_size = 25;
        let mut credentials = CredentialStore::new(PathBuf::from("/nonexistent/credentials.toml"));
        credentials.set_trakt_access_token("tok".to_string());

        let client = TraktClient::from_config(&config, &credentials, Utc::now()).unwrap();
        assert!(client.is_authenticated());
        assert_eq!(client.page_size, 25);
        assert_eq!(client.endpoint().access_token, Some("tok"));
        assert_eq!(client.source_name(), "trakt");
    }

    #[test]
    fn page_size_is_at_least_one() {
        let client = TraktClient::new("cid".to_string(), "https://api.trakt.tv".to_string(), Duration::from_secs(1))
            .with_page_size(0);
        assert_eq!(client.page_size, 1);
        assert!(!client.is_authenticated());
    }
}
