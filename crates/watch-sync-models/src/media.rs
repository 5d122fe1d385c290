use crate::media_ids::MediaIds;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of watch event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Movie,
    Episode,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Movie => "movie",
            RecordKind::Episode => "episode",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default)]
    pub ids: MediaIds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    /// Remaining `extended=full` fields, kept so the raw cache stays lossless
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShowDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(default)]
    pub ids: MediaIds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EpisodeDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub ids: MediaIds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_aired: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EpisodeDetail {
    /// First artwork URL found in the episode's `images` object
    pub fn image_url(&self) -> Option<String> {
        let images = self.images.as_ref()?.as_object()?;
        images.values().find_map(|group| {
            let group = group.as_object()?;
            ["thumb", "screenshot", "poster", "full"].iter().find_map(|key| {
                match group.get(*key)? {
                    Value::String(url) if !url.is_empty() => Some(url.clone()),
                    // Trakt wraps some image sets in arrays of bare hosts
                    Value::Array(urls) => urls
                        .iter()
                        .filter_map(|u| u.as_str())
                        .find(|u| !u.is_empty())
                        .map(|u| u.to_string()),
                    _ => None,
                }
            })
        })
    }
}

/// One season of a `shows/{id}/seasons?extended=episodes` listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SeasonListing {
    pub number: u32,
    #[serde(default)]
    pub episodes: Option<Vec<EpisodeDetail>>,
}

/// One hit of `search/show`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShowSearchResult {
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub show: Option<ShowDetail>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Person {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    #[serde(default)]
    pub person: Option<Person>,
}

/// `movies/{id}/people` and `shows/{id}/people`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PeopleListing {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

impl PeopleListing {
    /// Up to `limit` cast names, in the order the catalog returned them
    pub fn top_names(&self, limit: usize) -> Vec<String> {
        self.cast
            .iter()
            .take(limit)
            .filter_map(|c| c.person.as_ref().and_then(|p| p.name.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn episode_image_prefers_thumb() {
        let ep: EpisodeDetail = serde_json::from_value(json!({
            "title": "Pilot",
            "images": { "screenshot": { "full": "f.jpg", "thumb": "t.jpg" } }
        }))
        .unwrap();
        assert_eq!(ep.image_url().as_deref(), Some("t.jpg"));
    }

    #[test]
    fn top_names_respects_limit_and_order() {
        let people: PeopleListing = serde_json::from_value(json!({
            "cast": [
                {"person": {"name": "A"}}, {"person": {"name": "B"}},
                {"person": {}}, {"person": {"name": "D"}},
                {"person": {"name": "E"}}, {"person": {"name": "F"}}
            ]
        }))
        .unwrap();
        assert_eq!(people.top_names(5), vec!["A", "B", "D", "E"]);
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let raw = json!({"title": "Heat", "ids": {"trakt": 1}, "tagline": "A Los Angeles crime saga"});
        let movie: MovieDetail = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&movie).unwrap(), raw);
    }
}
