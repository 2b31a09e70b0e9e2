//! Single-threaded completion context.
//!
//! Transports finish on whatever runtime thread polled them. Callers instead
//! receive their completions on one designated thread: the thread that drives
//! a [`CompletionLoop`]. Posting is done through the cloneable
//! [`CompletionQueue`] handle.
//!
//! ```
//! use soundcloud_client::CompletionQueue;
//!
//! let (queue, mut completions) = CompletionQueue::new();
//! queue.post(|| println!("runs on the loop thread"));
//! assert_eq!(completions.run_pending(), 1);
//! ```

use std::thread::{self, JoinHandle};
use tokio::sync::mpsc;
use tracing::{debug, trace};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Handle used to schedule work on a [`CompletionLoop`].
#[derive(Debug, Clone)]
pub struct CompletionQueue {
    sender: mpsc::UnboundedSender<Job>,
}

/// Receiving side of a completion queue, owned by the context thread.
///
/// Jobs run one at a time, in the order they were posted.
#[derive(Debug)]
pub struct CompletionLoop {
    receiver: mpsc::UnboundedReceiver<Job>,
}

impl CompletionQueue {
    /// Create a queue and the loop that drains it.
    pub fn new() -> (CompletionQueue, CompletionLoop) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (CompletionQueue { sender }, CompletionLoop { receiver })
    }

    /// Create a queue drained by a dedicated thread named `name`.
    ///
    /// The thread exits once every queue handle has been dropped.
    pub fn spawn_thread(name: &str) -> std::io::Result<(CompletionQueue, JoinHandle<()>)> {
        let (queue, completions) = Self::new();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || completions.run())?;
        Ok((queue, handle))
    }

    /// Schedule `job` on the loop. Returns `false` if the loop is gone.
    pub fn post<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let posted = self.sender.send(Box::new(job)).is_ok();
        if !posted {
            debug!("Completion loop closed, dropping job");
        }
        posted
    }

    /// Whether the loop side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl CompletionLoop {
    /// Run every job queued so far without blocking. Returns how many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut count = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job();
            count += 1;
        }
        if count > 0 {
            trace!(count, "Ran pending completions");
        }
        count
    }

    /// Block until one job is available and run it.
    ///
    /// Returns `false` once every queue handle is dropped and nothing is left.
    /// Must not be called from within an async runtime.
    pub fn run_next(&mut self) -> bool {
        match self.receiver.blocking_recv() {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Run jobs until every queue handle has been dropped.
    pub fn run(mut self) {
        while self.run_next() {}
        debug!("Completion loop finished");
    }
}
