//! Main SoundCloud client.

use crate::async_request::{AsyncRequest, Dispatcher};
use crate::completion::CompletionQueue;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::request::{HttpMethod, Parameters};
use crate::transport::ReqwestTransport;
use soundcloud_core::{parse_track, parse_tracks, parse_user, JsonNode, Track, User};
use std::sync::Arc;
use tracing::debug;

/// Client for the SoundCloud API.
///
/// Every method builds an idle [`AsyncRequest`]; nothing is sent until the
/// caller starts it. Completions are delivered on the dispatcher's
/// completion queue.
///
/// # Example
///
/// ```ignore
/// use soundcloud_client::{ClientConfig, CompletionQueue, SoundcloudClient};
///
/// let config = ClientConfig::load(None)?;
/// let (queue, _thread) = CompletionQueue::spawn_thread("soundcloud-completions")?;
/// let client = SoundcloudClient::with_reqwest(config, queue)?;
///
/// let mut request = client.track(42, |result| match result {
///     Ok(track) => println!("{} by {}", track.title, track.created_by.username),
///     Err(e) => eprintln!("failed: {e}"),
/// })?;
/// request.start()?;
/// ```
#[derive(Debug, Clone)]
pub struct SoundcloudClient {
    config: Arc<ClientConfig>,
    dispatcher: Dispatcher,
}

impl SoundcloudClient {
    pub fn new(config: ClientConfig, dispatcher: Dispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher,
        }
    }

    /// Create a client using the HTTP transport on the current Tokio runtime.
    pub fn with_reqwest(config: ClientConfig, completions: CompletionQueue) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        let dispatcher = Dispatcher::new(transport, completions)?;
        Ok(Self::new(config, dispatcher))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Build a request for an arbitrary API path.
    pub fn request<T, P, C>(
        &self,
        method: HttpMethod,
        path: &str,
        parameters: Option<&Parameters>,
        parse: P,
        completion: C,
    ) -> Result<AsyncRequest<T>>
    where
        T: Send + 'static,
        P: FnOnce(JsonNode<'_>) -> Result<T> + Send + 'static,
        C: FnOnce(Result<T>) + Send + 'static,
    {
        let url = self.config.resource_url(path)?;
        let descriptor = method.request(url, parameters);

        Ok(AsyncRequest::new(
            self.dispatcher.clone(),
            descriptor,
            parse,
            completion,
        ))
    }

    /// Fetch a single track.
    pub fn track<C>(&self, identifier: i64, completion: C) -> Result<AsyncRequest<Track>>
    where
        C: FnOnce(Result<Track>) + Send + 'static,
    {
        debug!(track_id = identifier, "Building track request");
        let client_id = self.config.client_id.clone();

        self.request(
            HttpMethod::Get,
            &format!("tracks/{identifier}"),
            None,
            move |json: JsonNode<'_>| parse_track(json, &client_id),
            completion,
        )
    }

    /// Fetch a single user.
    pub fn user<C>(&self, identifier: i64, completion: C) -> Result<AsyncRequest<User>>
    where
        C: FnOnce(Result<User>) + Send + 'static,
    {
        debug!(user_id = identifier, "Building user request");
        let client_id = self.config.client_id.clone();

        self.request(
            HttpMethod::Get,
            &format!("users/{identifier}"),
            None,
            move |json: JsonNode<'_>| parse_user(json, &client_id),
            completion,
        )
    }

    /// Fetch the tracks uploaded by a user.
    pub fn user_tracks<C>(&self, identifier: i64, completion: C) -> Result<AsyncRequest<Vec<Track>>>
    where
        C: FnOnce(Result<Vec<Track>>) + Send + 'static,
    {
        let client_id = self.config.client_id.clone();

        self.request(
            HttpMethod::Get,
            &format!("users/{identifier}/tracks"),
            None,
            move |json: JsonNode<'_>| parse_tracks(json, &client_id),
            completion,
        )
    }

    /// Search tracks by free text.
    pub fn search_tracks<C>(
        &self,
        query: &str,
        limit: Option<u32>,
        completion: C,
    ) -> Result<AsyncRequest<Vec<Track>>>
    where
        C: FnOnce(Result<Vec<Track>>) + Send + 'static,
    {
        debug!(query = %query, limit = ?limit, "Building track search request");
        let client_id = self.config.client_id.clone();

        let mut parameters = Parameters::new().with("q", query);
        if let Some(limit) = limit {
            parameters.insert("limit", limit);
        }

        self.request(
            HttpMethod::Get,
            "tracks",
            Some(&parameters),
            move |json: JsonNode<'_>| parse_tracks(json, &client_id),
            completion,
        )
    }
}
