use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use watch_sync_config::CredentialStore;
use crate::error::SourceError;

/// Create a reqwest Client with a browser-like user agent and a per-request timeout
pub fn create_trakt_client(timeout: Duration) -> Client {
    Client::builder()
        .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Access token stored by the device-flow authenticator.
///
/// Acquiring or refreshing tokens happens outside this tool; a missing or
/// expired token is reported so the caller can abort the run.
pub fn stored_access_token(store: &CredentialStore, now: DateTime<Utc>) -> Result<String, SourceError> {
    if store.get_trakt_access_token().is_none() {
        return Err(SourceError::NotAuthenticated(
            "no Trakt access token found; run the authenticator first".to_string(),
        ));
    }
    store.valid_trakt_token(now).cloned().ok_or_else(|| {
        let expired_at = store
            .get_trakt_token_expires()
            .map(|e| e.to_rfc3339())
            .unwrap_or_default();
        SourceError::NotAuthenticated(format!("Trakt access token expired at {}", expired_at))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_token_is_not_authenticated() {
        let store = CredentialStore::new(PathBuf::from("/nonexistent/credentials.toml"));
        let err = stored_access_token(&store, Utc::now()).unwrap_err();
        assert!(matches!(err, SourceError::NotAuthenticated(_)));
    }

    #[test]
    fn expired_token_is_not_authenticated() {
        let mut store = CredentialStore::new(PathBuf::from("/nonexistent/credentials.toml"));
        let now = Utc::now();
        store.set_trakt_access_token("tok".to_string());
        store.set_trakt_token_expires(now - chrono::Duration::seconds(5));
        let err = stored_access_token(&store, now).unwrap_err();
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn valid_token_is_returned() {
        let mut store = CredentialStore::new(PathBuf::from("/nonexistent/credentials.toml"));
        store.set_trakt_access_token("tok".to_string());
        assert_eq!(stored_access_token(&store, Utc::now()).unwrap(), "tok");
    }
}
