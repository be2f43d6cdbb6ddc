//! Cooperative run control: cancellation and pause.
//!
//! Every algorithm polls an [`ExecutionControl`] at each step. There is no
//! preemption anywhere in the engine: one logical search runs at a time and
//! yields explicitly, so cancellation latency is bounded by the work between
//! two consecutive polls (one neighbor expansion).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Polling interval while paused.
const PAUSE_POLL: Duration = Duration::from_millis(25);

/// Cancellation and pause contract consumed by every algorithm and by path
/// reconstruction.
pub trait ExecutionControl {
    /// Whether this run should stop immediately. Once true, it stays true.
    fn should_stop(&self) -> bool;

    /// Block while paused, re-checking at a fixed interval. Returns as soon
    /// as the controller is unpaused or the run is stopped.
    fn await_if_paused(&self);
}

/// One stop-then-pause-then-stop checkpoint.
///
/// The double stop check means a stop requested while paused is observed
/// without expanding another neighbor.
#[inline]
pub(crate) fn interrupted<C: ExecutionControl>(control: &C) -> bool {
    if control.should_stop() {
        return true;
    }
    control.await_if_paused();
    control.should_stop()
}

#[derive(Debug, Default)]
struct Shared {
    /// Token of the run currently allowed to proceed.
    current: AtomicU64,
    paused: AtomicBool,
}

/// Issues run tokens and owns the pause flag.
///
/// Each search invocation is tagged with a monotonically increasing token;
/// a run observes `should_stop()` as soon as a newer run has begun. This
/// gives cancel-on-supersede semantics without a shared stop boolean racing
/// across runs.
#[derive(Clone, Debug, Default)]
pub struct RunCoordinator {
    inner: Arc<Shared>,
}

impl RunCoordinator {
    /// Create a coordinator with no active run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, superseding any run still in flight.
    pub fn begin_run(&self) -> RunHandle {
        let token = self.inner.current.fetch_add(1, Ordering::Relaxed) + 1;
        RunHandle {
            inner: Arc::clone(&self.inner),
            token,
        }
    }

    /// Cancel the active run without starting a new one.
    pub fn supersede(&self) {
        self.inner.current.fetch_add(1, Ordering::Relaxed);
    }

    /// Pause or resume the active run.
    pub fn set_paused(&self, paused: bool) {
        self.inner.paused.store(paused, Ordering::Relaxed);
    }

    /// Whether the pause flag is currently set.
    pub fn is_paused(&self) -> bool {
        self.inner.paused.load(Ordering::Relaxed)
    }
}

/// Control handle for a single run, created by [`RunCoordinator::begin_run`].
#[derive(Clone, Debug)]
pub struct RunHandle {
    inner: Arc<Shared>,
    token: u64,
}

impl RunHandle {
    /// The token identifying this run.
    pub fn token(&self) -> u64 {
        self.token
    }
}

impl ExecutionControl for RunHandle {
    #[inline]
    fn should_stop(&self) -> bool {
        self.inner.current.load(Ordering::Relaxed) != self.token
    }

    fn await_if_paused(&self) {
        while self.inner.paused.load(Ordering::Relaxed) && !self.should_stop() {
            std::thread::sleep(PAUSE_POLL);
        }
    }
}

/// A control that never stops and never pauses, for headless callers and
/// tests.
#[derive(Copy, Clone, Debug, Default)]
pub struct FreeRun;

impl ExecutionControl for FreeRun {
    #[inline]
    fn should_stop(&self) -> bool {
        false
    }

    #[inline]
    fn await_if_paused(&self) {}
}
