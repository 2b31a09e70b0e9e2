//! Track domain type

use crate::client_id::ClientId;
use crate::error::{Result, SdkError};
use crate::json::JsonNode;
use crate::types::{App, ImageUrls, User};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Format of the `created_at` field, e.g. `2013/08/26 14:42:31 +0000`.
pub const TRACK_DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S %z";

/// Kind of track, as declared by the uploader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackType {
    Original,
    Remix,
    Live,
    Recording,
    Spoken,
    Podcast,
    Demo,
    InProgress,
    Stem,
    Loop,
    SoundEffect,
    Sample,
    Other,
}

impl TrackType {
    /// Parse the API's `track_type` value. Unknown values yield `None`.
    pub fn from_api(value: &str) -> Option<Self> {
        let track_type = match value {
            "original" => TrackType::Original,
            "remix" => TrackType::Remix,
            "live" => TrackType::Live,
            "recording" => TrackType::Recording,
            "spoken" => TrackType::Spoken,
            "podcast" => TrackType::Podcast,
            "demo" => TrackType::Demo,
            "in progress" => TrackType::InProgress,
            "stem" => TrackType::Stem,
            "loop" => TrackType::Loop,
            "sound effect" => TrackType::SoundEffect,
            "sample" => TrackType::Sample,
            "other" => TrackType::Other,
            _ => return None,
        };
        Some(track_type)
    }

    pub fn as_api_str(&self) -> &'static str {
        match self {
            TrackType::Original => "original",
            TrackType::Remix => "remix",
            TrackType::Live => "live",
            TrackType::Recording => "recording",
            TrackType::Spoken => "spoken",
            TrackType::Podcast => "podcast",
            TrackType::Demo => "demo",
            TrackType::InProgress => "in progress",
            TrackType::Stem => "stem",
            TrackType::Loop => "loop",
            TrackType::SoundEffect => "sound effect",
            TrackType::Sample => "sample",
            TrackType::Other => "other",
        }
    }
}

/// A track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub identifier: i64,

    pub created_at: Option<DateTime<Utc>>,
    /// Uploader (mini representation)
    pub created_by: User,
    /// App used to upload the track
    pub created_with: Option<App>,

    pub duration: Duration,

    pub commentable: bool,
    pub streamable: bool,
    pub downloadable: bool,

    pub stream_url: Option<Url>,
    pub download_url: Option<Url>,
    /// Track page on the website
    pub permalink_url: Option<Url>,

    pub release_year: Option<u32>,
    pub release_month: Option<u32>,
    pub release_day: Option<u32>,

    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
    pub genre: Option<String>,
    pub track_type: Option<TrackType>,
    pub title: String,
    /// Original file format (mp3, m4a, ...)
    pub format: Option<String>,
    /// Original file size in bytes
    pub content_size: Option<u64>,

    pub artwork_url: ImageUrls,
    pub waveform_url: ImageUrls,

    pub playback_count: Option<u64>,
    pub download_count: Option<u64>,
    pub favorite_count: Option<u64>,
    pub comment_count: Option<u64>,
}

impl Track {
    /// Decode a track.
    ///
    /// `id` and `user` are required; every other field falls back to a
    /// default or `None` when missing or malformed.
    pub fn try_from_json(json: JsonNode<'_>, client_id: &ClientId) -> Result<Self> {
        let identifier = json
            .at("id")
            .as_int()
            .ok_or_else(|| SdkError::parsing("id"))?;
        let created_by = User::from_json(json.at("user"), client_id)
            .ok_or_else(|| SdkError::parsing("user"))?;

        Ok(Self {
            identifier,
            created_at: json.at("created_at").as_date(TRACK_DATE_FORMAT),
            created_by,
            created_with: App::from_json(json.at("created_with"), client_id),
            duration: json
                .at("duration")
                .as_double()
                .and_then(duration_from_millis)
                .unwrap_or_default(),
            commentable: json.at("commentable").as_bool().unwrap_or(false),
            streamable: json.at("streamable").as_bool().unwrap_or(false),
            downloadable: json.at("downloadable").as_bool().unwrap_or(false),
            stream_url: json.at("stream_url").as_url(client_id),
            download_url: json.at("download_url").as_url(client_id),
            permalink_url: json.at("permalink_url").as_url(client_id),
            release_year: as_u32(json.at("release_year")),
            release_month: as_u32(json.at("release_month")),
            release_day: as_u32(json.at("release_day")),
            tags: json.at("tag_list").as_str().map(parse_tag_list),
            description: json.at("description").as_string(),
            genre: json.at("genre").as_string(),
            track_type: json.at("track_type").as_str().and_then(TrackType::from_api),
            title: json.at("title").as_string().unwrap_or_default(),
            format: json.at("original_format").as_string(),
            content_size: json.at("original_content_size").as_u64(),
            artwork_url: ImageUrls::new(json.at("artwork_url").as_url(client_id)),
            waveform_url: ImageUrls::new(json.at("waveform_url").as_url(client_id)),
            playback_count: json.at("playback_count").as_u64(),
            download_count: json.at("download_count").as_u64(),
            favorite_count: json.at("favoritings_count").as_u64(),
            comment_count: json.at("comment_count").as_u64(),
        })
    }

    pub fn from_json(json: JsonNode<'_>, client_id: &ClientId) -> Option<Self> {
        Self::try_from_json(json, client_id).ok()
    }
}

fn as_u32(node: JsonNode<'_>) -> Option<u32> {
    node.as_u64().and_then(|v| u32::try_from(v).ok())
}

fn duration_from_millis(millis: f64) -> Option<Duration> {
    if !millis.is_finite() || millis < 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(millis / 1000.0).ok()
}

/// Split a `tag_list` value.
///
/// Tags are separated by spaces; multi-word tags are wrapped in double
/// quotes (`rock "post punk" live`).
pub fn parse_tag_list(tag_list: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for c in tag_list.chars() {
        match c {
            '"' => {
                if quoted && !current.is_empty() {
                    tags.push(std::mem::take(&mut current));
                }
                quoted = !quoted;
            }
            c if c.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tags.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tags.push(current);
    }

    tags
}
