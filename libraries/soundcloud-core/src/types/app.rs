//! App domain type

use crate::client_id::ClientId;
use crate::json::JsonNode;
use serde::Serialize;
use url::Url;

/// Application a track was uploaded with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct App {
    pub identifier: i64,
    pub name: String,
    /// Website of the app
    pub website: Option<Url>,
    /// Page of the app on SoundCloud
    pub permalink_url: Option<Url>,
}

impl App {
    /// Decode an app, requiring `id` and `name`.
    pub fn from_json(json: JsonNode<'_>, client_id: &ClientId) -> Option<Self> {
        Some(Self {
            identifier: json.at("id").as_int()?,
            name: json.at("name").as_string()?,
            website: json.at("external_url").as_url(client_id),
            permalink_url: json.at("permalink_url").as_url(client_id),
        })
    }
}
