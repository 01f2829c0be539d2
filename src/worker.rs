//! Off-thread CPU move computation
//!
//! The search is synchronous and CPU-bound, so it runs on its own thread and
//! the caller never blocks on it. Requests queue up on a channel and are
//! served one at a time; each gets its own budget clock and counters inside
//! the engine, so nothing is shared between them.
//!
//! ```rust,ignore
//! let worker = CpuWorker::spawn(config.selector())?;
//! let pending = worker.submit(SearchRequest::new(position, 6, move_number))?;
//! // ... keep the UI responsive, then:
//! if let Some(result) = pending.try_result() {
//!     apply(result?);
//! }
//! ```

use std::thread::{self, JoinHandle};
use std::time::Duration;

use chess_engine::{CancellationToken, EngineResult, MoveSelector, SearchRequest, SearchResult};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender, TryRecvError};

use crate::error::{OpponentError, OpponentResult};

/// Name of the search thread, visible in debuggers and panic messages
pub const WORKER_THREAD_NAME: &str = "cpu-opponent-search";

struct Job {
    request: SearchRequest,
    reply: Sender<EngineResult<SearchResult>>,
}

/// Handle to the search thread
///
/// Dropping it closes the queue, lets queued requests finish and joins the thread.
pub struct CpuWorker {
    jobs: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl CpuWorker {
    /// Start the search thread
    pub fn spawn(selector: MoveSelector) -> OpponentResult<Self> {
        let (jobs, queue) = unbounded::<Job>();
        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.into())
            .spawn(move || serve(selector, queue))
            .map_err(|source| OpponentError::WorkerSpawn { source })?;

        tracing::info!("[WORKER] Search thread started");
        Ok(Self {
            jobs: Some(jobs),
            handle: Some(handle),
        })
    }

    /// Queue a move request
    ///
    /// The request keeps its own cancellation token if it has one; otherwise
    /// a fresh token is attached and exposed through the returned handle.
    pub fn submit(&self, request: SearchRequest) -> OpponentResult<PendingMove> {
        let cancel = request.cancel.clone().unwrap_or_default();
        let request = request.with_cancellation(cancel.clone());
        let (reply, result) = bounded(1);

        let jobs = self.jobs.as_ref().ok_or(OpponentError::WorkerUnavailable)?;
        jobs.send(Job { request, reply })
            .map_err(|_| OpponentError::WorkerUnavailable)?;

        Ok(PendingMove { result, cancel })
    }
}

impl Drop for CpuWorker {
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("[WORKER] Search thread panicked");
            }
        }
    }
}

fn serve(selector: MoveSelector, queue: Receiver<Job>) {
    for job in queue.iter() {
        let result = selector.select(&job.request);
        if let Err(err) = &result {
            tracing::warn!("[WORKER] Move request failed: {}", err);
        }
        if job.reply.send(result).is_err() {
            tracing::debug!("[WORKER] Requester went away before the result arrived");
        }
    }
    tracing::info!("[WORKER] Request queue closed, search thread exiting");
}

/// A submitted move request whose result may not be ready yet
pub struct PendingMove {
    result: Receiver<EngineResult<SearchResult>>,
    cancel: CancellationToken,
}

impl PendingMove {
    /// The result if the search has finished, without blocking
    ///
    /// Yields the result once; later calls report the worker as unavailable.
    pub fn try_result(&self) -> Option<OpponentResult<SearchResult>> {
        match self.result.try_recv() {
            Ok(result) => Some(result.map_err(OpponentError::from)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(OpponentError::WorkerUnavailable)),
        }
    }

    /// Block until the result arrives or `timeout` passes
    pub fn wait_timeout(&self, timeout: Duration) -> Option<OpponentResult<SearchResult>> {
        match self.result.recv_timeout(timeout) {
            Ok(result) => Some(result.map_err(OpponentError::from)),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(OpponentError::WorkerUnavailable)),
        }
    }

    /// Block until the result arrives
    pub fn wait(self) -> OpponentResult<SearchResult> {
        let result = self
            .result
            .recv()
            .map_err(|_| OpponentError::WorkerUnavailable)?;
        Ok(result?)
    }

    /// Ask the search to stop after the depth it is working on
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }
}
