//! Error types for the SoundCloud client.
//!
//! The client shares the SDK-wide error type so that results produced by
//! parse functions and by the request pipeline are interchangeable.

pub use soundcloud_core::error::{Result, SdkError, TransportError, TransportErrorKind};
