//! Bounded liveness polling.
//!
//! The daemon forks, writes its PID file and later removes it on its own
//! schedule. [`LivenessPoller::wait_for`] turns those asynchronous transitions
//! into a synchronous answer by re-probing once per tick until the target
//! state holds or the tick budget runs out.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::trace;

use super::LIFECYCLE_TARGET;
use super::error::LifecycleError;
use super::probe::FilesystemProbe;
use super::types::LifecycleOutput;

/// Length of one polling tick.
pub const TICK: Duration = Duration::from_secs(1);

/// Source of the delay between polls.
pub trait Clock {
    fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Clock that blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Existence state a wait is trying to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
}

impl Presence {
    const fn is_satisfied_by(self, exists: bool) -> bool {
        match self {
            Self::Present => exists,
            Self::Absent => !exists,
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => formatter.write_str("present"),
            Self::Absent => formatter.write_str("absent"),
        }
    }
}

/// Waits for a path to reach a target existence state.
#[derive(Debug, Clone, Copy)]
pub struct LivenessPoller<P, C> {
    probe: P,
    clock: C,
    timeout_ticks: u64,
}

impl<P: FilesystemProbe, C: Clock> LivenessPoller<P, C> {
    pub const fn new(probe: P, clock: C, timeout_ticks: u64) -> Self {
        Self {
            probe,
            clock,
            timeout_ticks,
        }
    }

    /// Blocks until `path` reaches `target`.
    ///
    /// Each unsatisfied probe emits one progress tick, sleeps for [`TICK`] and
    /// counts it. When the count exceeds the budget the wait is abandoned.
    /// A path already in the target state returns `Ok(0)` without sleeping.
    /// The empty path never exists, so waiting for it to be absent succeeds
    /// at once.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::WaitTimeout`] when the budget is exhausted and
    /// [`LifecycleError::Io`] when a progress tick cannot be written.
    pub fn wait_for<W: Write, E: Write>(
        &self,
        path: &Path,
        target: Presence,
        output: &mut LifecycleOutput<W, E>,
    ) -> Result<u64, LifecycleError> {
        let mut elapsed: u64 = 0;
        while !target.is_satisfied_by(self.probe.exists(path)) {
            output.progress_tick()?;
            self.clock.sleep(TICK);
            elapsed += 1;
            trace!(
                target: LIFECYCLE_TARGET,
                path = %path.display(),
                %target,
                elapsed,
                "still waiting"
            );
            if elapsed > self.timeout_ticks {
                return Err(LifecycleError::WaitTimeout {
                    path: path.to_path_buf(),
                    target,
                    timeout_secs: self.timeout_ticks,
                });
            }
        }
        Ok(elapsed)
    }
}
