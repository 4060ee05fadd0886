//! The engine thread.
//!
//! [`spawn_engine`] moves a [`Simulation`] onto a dedicated OS thread and
//! returns an [`EngineHandle`]. The thread alternates between two kinds of
//! work:
//!
//! - **Ticks**: advance the world once per tick interval, increment the
//!   [`TickCounter`], notify the [`TickCallback`].
//! - **Deferred jobs**: between ticks, run queued bridge queries in FIFO
//!   order, waiting on the queue until the next tick is due.
//!
//! A tick is never interleaved with a job. Each loop iteration performs at
//! most one tick and at most one job, so neither starves the other.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::accessor::{EngineAccessor, Simulation, SimulationError};
use crate::bridge::{self, EngineBridge, EngineContext, JobReceiver, Received};
use crate::config::EngineConfig;
use crate::tick::TickCounter;

/// Name given to the engine OS thread.
pub const ENGINE_THREAD_NAME: &str = "worldtap-engine";

/// Errors that can end the engine thread.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The OS refused to start the engine thread.
    #[error("failed to spawn engine thread: {source}")]
    Spawn {
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Advancing the world failed.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: SimulationError,
    },

    /// The engine thread panicked outside a bridged query.
    #[error("engine thread panicked")]
    Panicked,
}

/// Timing for the engine thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Real time between ticks.
    pub tick_interval: Duration,
}

impl From<&EngineConfig> for EngineSettings {
    fn from(config: &EngineConfig) -> Self {
        Self {
            tick_interval: config.tick_interval(),
        }
    }
}

/// Why the engine loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// [`EngineHandle::shutdown`] was called.
    Halted,
    /// Every bridge was dropped, so no more work could arrive.
    QueueClosed,
}

/// Result of an engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineExit {
    /// Why the loop ended.
    pub reason: ExitReason,
    /// Ticks completed during the run.
    pub total_ticks: u64,
}

/// Callback invoked on the engine thread after each tick.
pub trait TickCallback: Send {
    /// Called after tick `tick` completes. The counter already reads `tick`.
    fn on_tick(&mut self, tick: u64, world: &dyn EngineAccessor);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _tick: u64, _world: &dyn EngineAccessor) {}
}

/// Owner's handle to a running engine thread.
#[derive(Debug)]
pub struct EngineHandle {
    bridge: EngineBridge,
    ticks: Arc<TickCounter>,
    thread: JoinHandle<Result<EngineExit, RunnerError>>,
}

impl EngineHandle {
    /// Bridge for submitting queries. Clone it to share across tasks.
    pub const fn bridge(&self) -> &EngineBridge {
        &self.bridge
    }

    /// The counter the engine increments.
    pub fn ticks(&self) -> Arc<TickCounter> {
        Arc::clone(&self.ticks)
    }

    /// Whether the engine thread is still running.
    pub fn is_running(&self) -> bool {
        !self.thread.is_finished()
    }

    /// Stop the engine and wait for its thread to exit.
    ///
    /// The halt is queued behind already-submitted work, so those queries
    /// are still answered. Queries submitted afterwards fail with
    /// [`EngineStopped`](crate::bridge::BridgeError::EngineStopped).
    pub fn shutdown(self) -> Result<EngineExit, RunnerError> {
        if self
            .bridge
            .queue()
            .invoke_later(EngineContext::request_halt)
            .is_err()
        {
            debug!("Engine thread already stopped");
        }
        self.thread.join().map_err(|_err| RunnerError::Panicked)?
    }
}

/// Start the engine thread.
///
/// `world` moves onto the new thread and is only ever touched there. The
/// first tick happens one tick interval after the thread starts.
pub fn spawn_engine(
    world: Box<dyn Simulation>,
    settings: EngineSettings,
    callback: Box<dyn TickCallback>,
) -> Result<EngineHandle, RunnerError> {
    let tick_interval = settings.tick_interval;
    let (queue, jobs) = bridge::queue();
    let ticks = Arc::new(TickCounter::new());
    let ctx = EngineContext::new(world, Arc::clone(&ticks));

    let thread = thread::Builder::new()
        .name(ENGINE_THREAD_NAME.to_owned())
        .spawn(move || run_engine(ctx, &jobs, tick_interval, callback))
        .map_err(|source| RunnerError::Spawn { source })?;

    Ok(EngineHandle {
        bridge: EngineBridge::new(queue),
        ticks,
        thread,
    })
}

/// Drive ticks and deferred jobs until halted or the queue closes.
///
/// Runs on the calling thread. [`spawn_engine`] is the usual entry point.
///
/// # Errors
///
/// Returns [`RunnerError::Simulation`] if advancing the world fails.
pub fn run_engine(
    mut ctx: EngineContext,
    jobs: &JobReceiver,
    tick_interval: Duration,
    mut callback: Box<dyn TickCallback>,
) -> Result<EngineExit, RunnerError> {
    let mut total_ticks: u64 = 0;
    let mut next_tick = schedule_after(Instant::now(), tick_interval);

    info!(
        tick_interval_ms = u64::try_from(tick_interval.as_millis()).unwrap_or(u64::MAX),
        "Engine thread starting"
    );

    loop {
        if ctx.halt_requested() {
            info!(total_ticks, "Engine halt requested");
            return Ok(EngineExit {
                reason: ExitReason::Halted,
                total_ticks,
            });
        }

        // --- Tick, if due ---
        if Instant::now() >= next_tick {
            let tick = match ctx.step() {
                Ok(tick) => tick,
                Err(e) => {
                    error!(error = %e, total_ticks, "Simulation step failed, engine stopping");
                    return Err(e.into());
                }
            };
            total_ticks = total_ticks.saturating_add(1);
            debug!(tick, "Tick complete");
            callback.on_tick(tick, ctx.world());
            next_tick = reschedule(next_tick, tick_interval);
        }

        // --- One deferred job, waiting at most until the next tick ---
        match jobs.recv_until(next_tick) {
            Received::Job(job) => job(&mut ctx),
            Received::TimedOut => {}
            Received::Closed => {
                info!(total_ticks, "All bridges dropped, engine stopping");
                return Ok(EngineExit {
                    reason: ExitReason::QueueClosed,
                    total_ticks,
                });
            }
        }
    }
}

fn schedule_after(from: Instant, interval: Duration) -> Instant {
    from.checked_add(interval).unwrap_or(from)
}

/// Next deadline after `previous`. An engine that fell a whole interval
/// behind restarts the cadence from now instead of bursting ticks.
fn reschedule(previous: Instant, interval: Duration) -> Instant {
    let now = Instant::now();
    let next = schedule_after(previous, interval);
    if next < now {
        schedule_after(now, interval)
    } else {
        next
    }
}
