//! SoundCloud SDK Core
//!
//! Transport-independent building blocks of the SoundCloud SDK.
//!
//! # Architecture
//!
//! - **JSON navigation**: [`JsonNode`] wraps a possibly-absent JSON value and
//!   offers total, shape-exact accessors
//! - **Error handling**: [`SdkError`] and the [`Result`] alias used by every
//!   request completion
//! - **Resources**: [`Track`], [`User`], [`App`] and their parse functions
//!
//! # Example
//!
//! ```rust
//! use soundcloud_core::{parse_track, ClientId, JsonDocument};
//!
//! let client_id = ClientId::new("my-client-id").unwrap();
//! let doc = JsonDocument::from_slice(
//!     br#"{"id": 42, "title": "Track A", "user": {"id": 1, "username": "kevin"}}"#,
//! );
//!
//! let track = parse_track(doc.root(), &client_id).unwrap();
//! assert_eq!(track.identifier, 42);
//! assert_eq!(track.created_by.username, "kevin");
//! ```

#![forbid(unsafe_code)]

pub mod client_id;
pub mod error;
pub mod json;
pub mod types;

pub use client_id::{ClientId, CLIENT_ID_PARAM};
pub use error::{Result, SdkError, TransportError, TransportErrorKind};
pub use json::{Elements, JsonDocument, JsonNode, NodeIndex};
pub use types::{
    parse_app, parse_tag_list, parse_track, parse_tracks, parse_user, App, ImageSize, ImageUrls,
    Track, TrackType, User, TRACK_DATE_FORMAT,
};
