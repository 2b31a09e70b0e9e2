//! Resource types and the parse functions that decode them.
//!
//! Parse functions have the shape `JsonNode -> Result<T>` expected by the
//! request pipeline: a payload that does not contain a usable value is a
//! `SdkError::Parsing`, never a partially populated record.

mod app;
mod image;
mod track;
mod user;

pub use app::App;
pub use image::{ImageSize, ImageUrls};
pub use track::{parse_tag_list, Track, TrackType, TRACK_DATE_FORMAT};
pub use user::User;

use crate::client_id::ClientId;
use crate::error::{Result, SdkError};
use crate::json::JsonNode;
use tracing::debug;

pub fn parse_track(json: JsonNode<'_>, client_id: &ClientId) -> Result<Track> {
    Track::try_from_json(json, client_id)
}

pub fn parse_user(json: JsonNode<'_>, client_id: &ClientId) -> Result<User> {
    User::try_from_json(json, client_id)
}

pub fn parse_app(json: JsonNode<'_>, client_id: &ClientId) -> Result<App> {
    App::from_json(json, client_id).ok_or_else(SdkError::parsing_failed)
}

/// Decode a list of tracks.
///
/// Accepts a bare array or a paginated `{"collection": [...]}` object.
/// Entries that do not decode are skipped.
pub fn parse_tracks(json: JsonNode<'_>, client_id: &ClientId) -> Result<Vec<Track>> {
    let items = if json.is_array() {
        json
    } else {
        json.at("collection")
    };

    let decoded = items
        .map_array(|item| Track::from_json(item, client_id))
        .ok_or_else(|| SdkError::parsing("collection"))?;

    let total = decoded.len();
    let tracks: Vec<Track> = decoded.into_iter().flatten().collect();
    if tracks.len() < total {
        debug!(
            total,
            skipped = total - tracks.len(),
            "Skipped undecodable tracks in collection"
        );
    }

    Ok(tracks)
}
