use serde::{Deserialize, Serialize};
use crate::media::RecordKind;
use crate::media_ids::MediaIds;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShowRef {
    #[serde(default)]
    pub title: Option<String>,
}

/// Flattened, display-ready watch event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedRecord {
    /// `YYYY-MM-DD HH:MM` in local time, or the raw value when unparseable
    #[serde(default)]
    pub watched_at: Option<String>,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default)]
    pub ids: Option<MediaIds>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<ShowRef>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// The persisted normalized output file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryDocument {
    /// Completion timestamp, RFC 3339 UTC
    pub generated_at: Option<String>,
    /// Elapsed seconds, two decimals
    #[serde(default)]
    pub generation_time: f64,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub items: Vec<NormalizedRecord>,
}

impl HistoryDocument {
    pub fn empty() -> Self {
        Self {
            generated_at: None,
            generation_time: 0.0,
            count: 0,
            items: Vec::new(),
        }
    }
}
