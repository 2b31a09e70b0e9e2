//! Asynchronous request lifecycle.
//!
//! An [`AsyncRequest`] owns one network call. Once started, the transport
//! runs on the Tokio runtime, the payload is decoded and handed to the
//! caller's parse function there, and the resulting [`Result`] is delivered to
//! the completion callback on the dispatcher's [`CompletionQueue`].
//!
//! ```text
//! Idle --start--> Running --delivered--> Completed
//!                    |
//!                    +------stop------> Stopped
//! ```
//!
//! The completion callback runs at most once, and never after `stop` has
//! returned `true`.

use crate::completion::CompletionQueue;
use crate::error::{Result, SdkError, TransportError};
use crate::request::RequestDescriptor;
use crate::transport::{RawResponse, Transport};
use soundcloud_core::{JsonDocument, JsonNode};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type ParseFn<T> = Box<dyn FnOnce(JsonNode<'_>) -> Result<T> + Send + 'static>;
type CompletionFn<T> = Box<dyn FnOnce(Result<T>) + Send + 'static>;

/// Lifecycle state of an [`AsyncRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Created, not started
    Idle,
    /// Submitted to the transport
    Running,
    /// Completion callback delivered (terminal)
    Completed,
    /// Cancelled by `stop` (terminal)
    Stopped,
}

impl RequestState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => RequestState::Idle,
            1 => RequestState::Running,
            2 => RequestState::Completed,
            _ => RequestState::Stopped,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            RequestState::Idle => 0,
            RequestState::Running => 1,
            RequestState::Completed => 2,
            RequestState::Stopped => 3,
        }
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestState::Idle => "idle",
            RequestState::Running => "running",
            RequestState::Completed => "completed",
            RequestState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// State shared between the request handle and its runtime task.
#[derive(Debug)]
struct StateCell(AtomicU8);

impl StateCell {
    fn new() -> Self {
        Self(AtomicU8::new(RequestState::Idle.as_u8()))
    }

    fn get(&self) -> RequestState {
        RequestState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Atomically move `from -> to`. Fails if the current state is not `from`.
    fn transition(&self, from: RequestState, to: RequestState) -> bool {
        self.0
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// Everything a request needs to run: transport, runtime and completion queue.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    runtime: Handle,
    completions: CompletionQueue,
}

impl Dispatcher {
    /// Create a dispatcher that spawns on the current Tokio runtime.
    ///
    /// Fails with `SdkError::Configuration` outside of a runtime.
    pub fn new(transport: Arc<dyn Transport>, completions: CompletionQueue) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|e| {
            SdkError::configuration(format!("no Tokio runtime available for requests: {e}"))
        })?;
        Ok(Self::with_runtime(transport, runtime, completions))
    }

    /// Create a dispatcher that spawns on `runtime`.
    pub fn with_runtime(
        transport: Arc<dyn Transport>,
        runtime: Handle,
        completions: CompletionQueue,
    ) -> Self {
        Self {
            transport,
            runtime,
            completions,
        }
    }

    pub fn completions(&self) -> &CompletionQueue {
        &self.completions
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("completions", &self.completions)
            .finish_non_exhaustive()
    }
}

/// One in-flight (or not yet started) API call.
///
/// Dropping a request does not cancel it: a running request still delivers
/// its completion. Use [`AsyncRequest::stop`] to cancel.
pub struct AsyncRequest<T> {
    dispatcher: Dispatcher,
    descriptor: RequestDescriptor,
    handlers: Option<(ParseFn<T>, CompletionFn<T>)>,
    state: Arc<StateCell>,
    task: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> AsyncRequest<T> {
    /// Create an idle request.
    ///
    /// `parse` turns the decoded payload into a value and must itself report
    /// missing or malformed data as `SdkError::Parsing`. It is only called for
    /// 2xx responses; any other status is delivered as `SdkError::Server`
    /// without reaching `parse`. `completion` receives the final result on the
    /// dispatcher's completion queue.
    pub fn new<P, C>(
        dispatcher: Dispatcher,
        descriptor: RequestDescriptor,
        parse: P,
        completion: C,
    ) -> Self
    where
        P: FnOnce(JsonNode<'_>) -> Result<T> + Send + 'static,
        C: FnOnce(Result<T>) + Send + 'static,
    {
        Self {
            dispatcher,
            descriptor,
            handlers: Some((Box::new(parse), Box::new(completion))),
            state: Arc::new(StateCell::new()),
            task: None,
        }
    }

    /// Submit the request to the transport.
    ///
    /// Only an idle request can be started; any other state yields
    /// `SdkError::InvalidState` and leaves the request untouched.
    pub fn start(&mut self) -> Result<()> {
        if !self
            .state
            .transition(RequestState::Idle, RequestState::Running)
        {
            return Err(SdkError::InvalidState(format!(
                "cannot start a request that is {}",
                self.state.get()
            )));
        }
        let Some((parse, completion)) = self.handlers.take() else {
            return Err(SdkError::InvalidState("request was already submitted".into()));
        };

        let descriptor = self.descriptor.clone();
        let transport = Arc::clone(&self.dispatcher.transport);
        let completions = self.dispatcher.completions.clone();
        let state = Arc::clone(&self.state);

        debug!(
            method = %descriptor.method(),
            url = %descriptor.url(),
            "Starting request"
        );

        let task = self.dispatcher.runtime.spawn(async move {
            let url = descriptor.url().clone();
            let outcome = transport.execute(descriptor).await;
            let result = decode(outcome, parse);

            let posted = completions.post(move || {
                if state.transition(RequestState::Running, RequestState::Completed) {
                    info!(url = %url, success = result.is_ok(), "Request completed");
                    completion(result);
                } else {
                    debug!(url = %url, "Request stopped before delivery, dropping result");
                }
            });

            if !posted {
                warn!("Completion queue closed, result dropped");
            }
        });

        self.task = Some(task);
        Ok(())
    }

    /// Cancel a running request.
    ///
    /// Returns `true` if the request was running and is now stopped; its
    /// completion callback will not run. On a request that is idle, completed
    /// or already stopped this does nothing and returns `false`.
    pub fn stop(&mut self) -> bool {
        if !self
            .state
            .transition(RequestState::Running, RequestState::Stopped)
        {
            return false;
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }

        debug!(url = %self.descriptor.url(), "Request stopped");
        true
    }
}

impl<T> AsyncRequest<T> {
    pub fn state(&self) -> RequestState {
        self.state.get()
    }

    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }
}

impl<T> fmt::Debug for AsyncRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncRequest")
            .field("descriptor", &self.descriptor)
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

/// Turn a transport outcome into the caller-visible result.
fn decode<T>(
    outcome: std::result::Result<RawResponse, TransportError>,
    parse: ParseFn<T>,
) -> Result<T> {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Transport failed");
            return Err(SdkError::Transport(e));
        }
    };

    if !response.is_success() {
        let message = String::from_utf8_lossy(&response.body).into_owned();
        warn!(status = response.status, "Server returned error status");
        return Err(SdkError::Server {
            status: response.status,
            message,
        });
    }

    let document = JsonDocument::from_slice(&response.body);
    let result = parse(document.root());
    if let Err(e) = &result {
        debug!(error = %e, "Parse function rejected payload");
    }
    result
}
