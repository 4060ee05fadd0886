//! Synchronous query bridge onto the engine thread.
//!
//! The engine thread owns all world state. Other threads never touch it;
//! they hand the engine a job through the [`DeferredQueue`] and wait for
//! the answer.
//!
//! # Flow
//!
//! 1. A caller passes a read-only operation to [`EngineBridge::submit`].
//! 2. The operation is wrapped in a job and appended to the engine's FIFO
//!    deferred-work queue, behind everything submitted before it.
//! 3. At its next safe point the engine thread runs the job. Panics are
//!    caught there, so the engine survives a faulty projector.
//! 4. The outcome goes back through a one-shot channel, which releases
//!    the caller exactly once.
//!
//! There is no backpressure: the queue is unbounded. There is no
//! cancellation either. A caller that stops waiting does not withdraw its
//! job; the job still runs and its result is dropped.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tracing::debug;

use crate::accessor::{EngineAccessor, Simulation, SimulationError};
use crate::projection::ProjectionError;
use crate::tick::TickCounter;

/// Work scheduled onto the engine thread.
pub type Job = Box<dyn FnOnce(&mut EngineContext) + Send + 'static>;

/// Errors surfaced to a thread waiting on the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    /// The engine thread has exited; the job was refused or dropped unrun.
    #[error("engine thread is not running")]
    EngineStopped,

    /// The operation ran and reported a failure.
    #[error("projection failed: {source}")]
    Projection {
        /// The failure raised on the engine thread.
        #[from]
        source: ProjectionError,
    },

    /// The operation panicked on the engine thread.
    #[error("query panicked on the engine thread: {message}")]
    Panicked {
        /// The panic payload, if it was a string.
        message: String,
    },

    /// The engine did not answer within the configured bound.
    #[error("engine did not answer within {waited_ms} ms")]
    TimedOut {
        /// How long the caller waited.
        waited_ms: u64,
    },
}

// ---------------------------------------------------------------------------
// Engine context
// ---------------------------------------------------------------------------

/// Everything the engine thread owns.
///
/// Jobs receive `&mut EngineContext`; queries submitted through the bridge
/// only ever see `&EngineContext`, whose surface is read-only.
pub struct EngineContext {
    world: Box<dyn Simulation>,
    ticks: Arc<TickCounter>,
    halt_requested: bool,
}

impl EngineContext {
    /// Wrap a world and the counter the engine increments.
    pub fn new(world: Box<dyn Simulation>, ticks: Arc<TickCounter>) -> Self {
        Self {
            world,
            ticks,
            halt_requested: false,
        }
    }

    /// Read-only view of the world.
    pub fn world(&self) -> &dyn EngineAccessor {
        self.world.accessor()
    }

    /// The process tick counter.
    pub fn ticks(&self) -> &TickCounter {
        &self.ticks
    }

    /// Ask the engine loop to exit after the current job.
    pub const fn request_halt(&mut self) {
        self.halt_requested = true;
    }

    /// Whether a halt has been requested.
    pub const fn halt_requested(&self) -> bool {
        self.halt_requested
    }

    /// Advance the world one tick and count it. Returns the new tick count.
    pub(crate) fn step(&mut self) -> Result<u64, SimulationError> {
        self.world.advance()?;
        Ok(self.ticks.increment())
    }
}

// ---------------------------------------------------------------------------
// Deferred work queue
// ---------------------------------------------------------------------------

/// Create the engine's deferred-work queue.
pub fn queue() -> (DeferredQueue, JobReceiver) {
    let (tx, rx) = mpsc::channel();
    (DeferredQueue { tx }, JobReceiver { rx })
}

/// Sending half of the engine's FIFO work queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DeferredQueue {
    tx: mpsc::Sender<Job>,
}

impl DeferredQueue {
    /// Schedule `job` to run on the engine thread after everything queued
    /// before it.
    pub fn invoke_later<F>(&self, job: F) -> Result<(), BridgeError>
    where
        F: FnOnce(&mut EngineContext) + Send + 'static,
    {
        self.tx
            .send(Box::new(job))
            .map_err(|_err| BridgeError::EngineStopped)
    }
}

/// What [`JobReceiver::recv_until`] produced.
pub enum Received {
    /// A job to run now.
    Job(Job),
    /// The deadline passed with nothing queued.
    TimedOut,
    /// Every [`DeferredQueue`] has been dropped.
    Closed,
}

/// Receiving half of the work queue, held by the engine thread.
#[derive(Debug)]
pub struct JobReceiver {
    rx: mpsc::Receiver<Job>,
}

impl JobReceiver {
    /// Wait for the next job until `deadline`.
    ///
    /// A deadline already in the past still returns a job if one is queued.
    pub fn recv_until(&self, deadline: Instant) -> Received {
        let wait = deadline.saturating_duration_since(Instant::now());
        match self.rx.recv_timeout(wait) {
            Ok(job) => Received::Job(job),
            Err(RecvTimeoutError::Timeout) => Received::TimedOut,
            Err(RecvTimeoutError::Disconnected) => Received::Closed,
        }
    }
}

// ---------------------------------------------------------------------------
// Bridge
// ---------------------------------------------------------------------------

/// Handle any thread uses to run read-only operations on the engine thread.
#[derive(Debug, Clone)]
pub struct EngineBridge {
    queue: DeferredQueue,
}

impl EngineBridge {
    /// A bridge feeding the given queue.
    pub const fn new(queue: DeferredQueue) -> Self {
        Self { queue }
    }

    /// The underlying work queue.
    pub const fn queue(&self) -> &DeferredQueue {
        &self.queue
    }

    /// Enqueue `op` and return a handle to its eventual result.
    ///
    /// `op` sees the whole engine state at one instant: nothing else runs
    /// on the engine thread while it executes.
    pub fn submit<T, F>(&self, op: F) -> Result<PendingQuery<T>, BridgeError>
    where
        T: Send + 'static,
        F: FnOnce(&EngineContext) -> Result<T, ProjectionError> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.queue.invoke_later(move |ctx| {
            let ctx: &EngineContext = ctx;
            let outcome = match panic::catch_unwind(AssertUnwindSafe(|| op(ctx))) {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(source)) => Err(BridgeError::Projection { source }),
                Err(payload) => Err(BridgeError::Panicked {
                    message: panic_message(payload.as_ref()),
                }),
            };
            if tx.send(outcome).is_err() {
                debug!("query caller stopped waiting; result discarded");
            }
        })?;
        Ok(PendingQuery { rx })
    }

    /// Run `op` on the engine thread, blocking this thread until it finishes.
    ///
    /// Must not be called from inside an async runtime; use [`Self::run`].
    pub fn run_blocking<T, F>(&self, op: F) -> Result<T, BridgeError>
    where
        T: Send + 'static,
        F: FnOnce(&EngineContext) -> Result<T, ProjectionError> + Send + 'static,
    {
        self.submit(op)?.wait()
    }

    /// Run `op` on the engine thread, suspending this task until it
    /// finishes or `timeout` elapses.
    pub async fn run<T, F>(&self, op: F, timeout: Option<Duration>) -> Result<T, BridgeError>
    where
        T: Send + 'static,
        F: FnOnce(&EngineContext) -> Result<T, ProjectionError> + Send + 'static,
    {
        self.submit(op)?.recv(timeout).await
    }
}

/// A submitted query awaiting its single result.
#[derive(Debug)]
pub struct PendingQuery<T> {
    rx: oneshot::Receiver<Result<T, BridgeError>>,
}

impl<T> PendingQuery<T> {
    /// Block the current thread until the engine answers.
    pub fn wait(self) -> Result<T, BridgeError> {
        self.rx
            .blocking_recv()
            .map_err(|_err| BridgeError::EngineStopped)?
    }

    /// Await the engine's answer, giving up after `timeout` if one is set.
    ///
    /// Giving up does not withdraw the job.
    pub async fn recv(self, timeout: Option<Duration>) -> Result<T, BridgeError> {
        let Some(limit) = timeout else {
            return self.rx.await.map_err(|_err| BridgeError::EngineStopped)?;
        };
        match tokio::time::timeout(limit, self.rx).await {
            Ok(received) => received.map_err(|_err| BridgeError::EngineStopped)?,
            Err(_elapsed) => Err(BridgeError::TimedOut {
                waited_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}
