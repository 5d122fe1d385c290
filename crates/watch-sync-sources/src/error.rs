use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{context}: HTTP {status}")]
    Status { status: u16, context: String },

    #[error("Failed to decode {context}: {message}")]
    Decode { context: String, message: String },

    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),
}

impl SourceError {
    pub fn status(status: u16, context: impl Into<String>) -> Self {
        SourceError::Status {
            status,
            context: context.into(),
        }
    }

    pub fn decode(context: impl Into<String>, err: impl std::fmt::Display) -> Self {
        SourceError::Decode {
            context: context.into(),
            message: err.to_string(),
        }
    }

    /// 404s are an expected "no such entity" answer rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::Status { status: 404, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_404_is_not_found() {
        assert!(SourceError::status(404, "Fetch show detail").is_not_found());
        assert!(!SourceError::status(503, "Fetch show detail").is_not_found());
        assert!(!SourceError::NotAuthenticated("x".to_string()).is_not_found());
    }
}
