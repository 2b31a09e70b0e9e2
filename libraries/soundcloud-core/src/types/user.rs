//! User domain type

use crate::client_id::ClientId;
use crate::error::{Result, SdkError};
use crate::json::JsonNode;
use crate::types::ImageUrls;
use serde::Serialize;
use url::Url;

/// SoundCloud user.
///
/// Users embedded in other resources (such as a track's uploader) are
/// "mini" representations: only identifier, username, permalink and avatar
/// are reliably present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub identifier: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub website: Option<Url>,
    /// Profile page URL
    pub permalink_url: Option<Url>,
    pub avatar_url: ImageUrls,
    pub track_count: Option<u64>,
    pub playlist_count: Option<u64>,
    pub followers_count: Option<u64>,
    pub followings_count: Option<u64>,
}

impl User {
    /// Decode a user, reporting the first missing required field.
    pub fn try_from_json(json: JsonNode<'_>, client_id: &ClientId) -> Result<Self> {
        let identifier = json
            .at("id")
            .as_int()
            .ok_or_else(|| SdkError::parsing("id"))?;
        let username = json
            .at("username")
            .as_string()
            .ok_or_else(|| SdkError::parsing("username"))?;

        Ok(Self {
            identifier,
            username,
            full_name: json.at("full_name").as_string(),
            city: json.at("city").as_string(),
            country: json.at("country").as_string(),
            description: json.at("description").as_string(),
            website: json.at("website").as_url(client_id),
            permalink_url: json.at("permalink_url").as_url(client_id),
            avatar_url: ImageUrls::new(json.at("avatar_url").as_url(client_id)),
            track_count: json.at("track_count").as_u64(),
            playlist_count: json.at("playlist_count").as_u64(),
            followers_count: json.at("followers_count").as_u64(),
            followings_count: json.at("followings_count").as_u64(),
        })
    }

    pub fn from_json(json: JsonNode<'_>, client_id: &ClientId) -> Option<Self> {
        Self::try_from_json(json, client_id).ok()
    }
}
