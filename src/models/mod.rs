use serde::{Deserialize, Serialize};

/// Preview summary returned by `GET /`.
///
/// Every field except `url` is optional. `icon`, `player`, `sensitive`,
/// `activityPub` and `oembed` are kept for schema compatibility with
/// existing consumers and are never filled by extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub url: String,
    pub title: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub sitename: Option<String>,
    pub player: Player,
    pub sensitive: bool,
    #[serde(rename = "activityPub")]
    pub activity_pub: Option<String>,
    pub oembed: Option<serde_json::Value>,
}

impl SummaryResult {
    /// An empty summary pointing at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        SummaryResult {
            url: url.into(),
            title: None,
            icon: None,
            description: None,
            thumbnail: None,
            sitename: None,
            player: Player::default(),
            sensitive: false,
            activity_pub: None,
            oembed: None,
        }
    }
}

/// Embeddable player metadata. Always serialized as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {}
