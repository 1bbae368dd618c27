//! Poll loop driver.
//!
//! Runs [`PollCycle::run_once`] on a fixed interval until interrupted. The
//! loop is the outermost containment boundary: a failed cycle is logged and
//! the next tick runs on schedule.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::api::HomeworkApi;
use crate::config::{check_credentials, Credentials};
use crate::cycle::{CycleOutcome, PollCycle};
use crate::models::LoopState;
use crate::telegram::Notifier;

/// Longest uninterrupted sleep; bounds shutdown latency between ticks.
const SLEEP_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    Running,
    Cycling,
    Stopped,
}

impl std::fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopPhase::Idle => write!(f, "Idle"),
            LoopPhase::Running => write!(f, "Running"),
            LoopPhase::Cycling => write!(f, "Cycling"),
            LoopPhase::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Why the loop reached [`LoopPhase::Stopped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Credentials were incomplete; no cycle ran.
    MissingCredentials,
    /// The shutdown flag was raised.
    Shutdown,
    /// The configured cycle limit was reached.
    CycleLimit,
}

/// Counters for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub cycles: u64,
    pub notified: u64,
    pub delivery_failures: u64,
    pub cycle_failures: u64,
}

pub struct PollLoop<A, N> {
    cycle: PollCycle<A, N>,
    poll_interval: Duration,
    max_cycles: Option<u64>,
    shutdown: Arc<AtomicBool>,
    clock: fn() -> i64,
    phase: LoopPhase,
    state: LoopState,
    stats: LoopStats,
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl<A: HomeworkApi, N: Notifier> PollLoop<A, N> {
    /// Create an idle loop.
    ///
    /// `from_date` seeds the first fetch; `None` uses the current time.
    pub fn new(
        cycle: PollCycle<A, N>,
        poll_interval: Duration,
        from_date: Option<i64>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            cycle,
            poll_interval,
            max_cycles: None,
            shutdown,
            clock: unix_now,
            phase: LoopPhase::Idle,
            state: LoopState::new(from_date.unwrap_or_else(unix_now)),
            stats: LoopStats::default(),
        }
    }

    pub fn with_max_cycles(mut self, max_cycles: Option<u64>) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    /// Gate on `credentials`, then poll until shutdown or the cycle limit.
    pub fn run(&mut self, credentials: &Credentials) -> StopReason {
        if self.phase != LoopPhase::Idle {
            tracing::warn!(phase = %self.phase, "Poll loop already started");
        }

        if !check_credentials(credentials) {
            self.phase = LoopPhase::Stopped;
            return StopReason::MissingCredentials;
        }

        self.phase = LoopPhase::Running;
        tracing::info!(
            interval_secs = self.poll_interval.as_secs(),
            from_date = self.state.last_poll_timestamp,
            "Homework status watcher started"
        );

        let reason = loop {
            if self.shutdown.load(Ordering::SeqCst) {
                break StopReason::Shutdown;
            }

            self.tick();

            if self.max_cycles.is_some_and(|max| self.stats.cycles >= max) {
                break StopReason::CycleLimit;
            }

            if self.sleep_interruptible() {
                break StopReason::Shutdown;
            }
        };

        self.phase = LoopPhase::Stopped;
        tracing::info!(?reason, cycles = self.stats.cycles, "Shutting down");
        reason
    }

    fn tick(&mut self) {
        self.phase = LoopPhase::Cycling;
        let now = (self.clock)();

        match self.cycle.run_once(&self.state, now) {
            Ok(CycleOutcome::NoChange) => {}
            Ok(CycleOutcome::Notified { next, .. }) => {
                self.state = next;
                self.stats.notified += 1;
            }
            Ok(CycleOutcome::DeliveryFailed { .. }) => {
                self.stats.delivery_failures += 1;
            }
            Err(e) => {
                self.stats.cycle_failures += 1;
                if e.is_critical() {
                    tracing::error!(severity = "critical", error = %e, "Program failure");
                } else {
                    tracing::error!(error = %e, "Program failure");
                }
            }
        }

        self.stats.cycles += 1;
        self.phase = LoopPhase::Running;
    }

    /// Sleep for the poll interval. Returns true if shutdown was requested.
    fn sleep_interruptible(&self) -> bool {
        let start = Instant::now();
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                return true;
            }
            let elapsed = start.elapsed();
            if elapsed >= self.poll_interval {
                return false;
            }
            std::thread::sleep((self.poll_interval - elapsed).min(SLEEP_SLICE));
        }
    }
}
