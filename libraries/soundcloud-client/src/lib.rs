//! SoundCloud Client
//!
//! Asynchronous client for the SoundCloud API.
//!
//! # Features
//!
//! - **Request building**: verbs, query strings and form bodies
//! - **Transport**: pluggable [`Transport`], `reqwest` by default
//! - **Lifecycle**: [`AsyncRequest`] with start/stop and exactly-once delivery
//! - **Completion context**: every callback runs on one [`CompletionLoop`]
//!   thread, so callers need no synchronization of their own
//!
//! # Example
//!
//! ```ignore
//! use soundcloud_client::{ClientConfig, CompletionQueue, SoundcloudClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::load(None)?;
//!     let (queue, completions) = CompletionQueue::spawn_thread("soundcloud-completions")?;
//!     let client = SoundcloudClient::with_reqwest(config, queue)?;
//!
//!     let mut request = client.search_tracks("field recording", Some(10), |result| {
//!         match result {
//!             Ok(tracks) => println!("Found {} tracks", tracks.len()),
//!             Err(e) => eprintln!("Search failed: {e}"),
//!         }
//!     })?;
//!     request.start()?;
//!
//!     drop(client);
//!     drop(request);
//!     completions.join().ok();
//!     Ok(())
//! }
//! ```

mod async_request;
mod client;
mod completion;
mod config;
mod error;
mod request;
mod transport;

pub use async_request::{AsyncRequest, Dispatcher, RequestState};
pub use client::SoundcloudClient;
pub use completion::{CompletionLoop, CompletionQueue};
pub use config::{ClientConfig, DEFAULT_API_URL, ENV_PREFIX};
pub use error::{Result, SdkError, TransportError, TransportErrorKind};
pub use request::{HttpMethod, Parameters, RequestDescriptor, FORM_CONTENT_TYPE};
pub use transport::{RawResponse, ReqwestTransport, Transport};

// Re-export the decoding layer so callers only need this crate
pub use soundcloud_core::{
    parse_app, parse_track, parse_tracks, parse_user, App, ClientId, ImageSize, ImageUrls,
    JsonDocument, JsonNode, Track, TrackType, User,
};
