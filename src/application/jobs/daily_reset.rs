//! Daily click counter reset at local midnight.
//!
//! [`DailyResetScheduler::start`] spawns one long-lived task that sleeps until
//! the next local midnight of the configured [`ResetZone`], zeroes every
//! link's `daily_clicks`, then re-arms for the following midnight. Failed
//! resets are retried a bounded number of times and then given up until the
//! next boundary; they never stop the loop.
//!
//! ```text
//! Idle -> Armed -> Firing -> Armed -> ... -> Stopped
//! ```
//!
//! The current [`SchedulerState`] is published on a `watch` channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use serde_json::json;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, sleep_until, timeout};
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::{error, info, warn};

use crate::application::jobs::{Clock, ResetZone, SystemClock};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Bounds on a single reset run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per run, the first one included.
    pub max_attempts: usize,
    /// Fixed pause between attempts.
    pub retry_delay: Duration,
    /// Upper bound on one attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
            attempt_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SchedulerState {
    Idle,
    Armed { next_reset: DateTime<Utc> },
    Firing { boundary: DateTime<Utc> },
    Stopped,
}

/// Background job zeroing `daily_clicks` once per local day.
pub struct DailyResetScheduler {
    links: Arc<dyn LinkRepository>,
    zone: ResetZone,
    clock: Arc<dyn Clock>,
    policy: RetryPolicy,
}

impl DailyResetScheduler {
    pub fn new(links: Arc<dyn LinkRepository>, zone: ResetZone) -> Self {
        Self {
            links,
            zone,
            clock: Arc::new(SystemClock),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn zone(&self) -> ResetZone {
        self.zone
    }

    /// Spawns the scheduler task.
    ///
    /// The task runs until [`ResetHandle::stop`] is called. Dropping the
    /// handle detaches the task without stopping it.
    pub fn start(self) -> ResetHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(SchedulerState::Idle);

        info!(zone = %self.zone, "Starting daily reset scheduler");
        let task = tokio::spawn(self.run(stop_rx, state_tx));

        ResetHandle {
            stop_tx,
            state_rx,
            task,
        }
    }

    /// Zeroes every link's `daily_clicks` now, with the configured retries.
    ///
    /// Each attempt is bounded by [`RetryPolicy::attempt_timeout`]. Returns
    /// the number of links that had a non-zero counter.
    ///
    /// # Errors
    ///
    /// Returns the last attempt's error once all attempts failed.
    pub async fn reset_now(&self) -> Result<u64, AppError> {
        let attempts = AtomicUsize::new(0);
        let strategy =
            FixedInterval::new(self.policy.retry_delay).take(self.policy.max_attempts.saturating_sub(1));

        let this = self;
        let counter = &attempts;
        let result = Retry::start(strategy, move || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            this.attempt_reset(attempt)
        })
        .await;

        let attempts = attempts.load(Ordering::SeqCst);
        match &result {
            Ok(rows) => {
                metrics::counter!("daily_reset_runs_total", "outcome" => "success").increment(1);
                info!(rows, attempts, "Daily click counters reset");
            }
            Err(e) => {
                metrics::counter!("daily_reset_runs_total", "outcome" => "failure").increment(1);
                error!(attempts, error = %e, "Daily reset failed after all attempts");
            }
        }

        result
    }

    async fn attempt_reset(&self, attempt: usize) -> Result<u64, AppError> {
        let outcome = timeout(
            self.policy.attempt_timeout,
            self.links.reset_all_daily_clicks(),
        )
        .await
        .unwrap_or_else(|_| {
            Err(AppError::unavailable(
                "Daily reset timed out",
                json!({ "timeout_secs": self.policy.attempt_timeout.as_secs() }),
            ))
        });

        if let Err(e) = &outcome {
            warn!(
                attempt,
                max_attempts = self.policy.max_attempts,
                error = %e,
                "Daily reset attempt failed"
            );
        }
        outcome
    }

    async fn run(self, mut stop_rx: watch::Receiver<bool>, state_tx: watch::Sender<SchedulerState>) {
        let mut last_fired: Option<DateTime<Utc>> = None;

        loop {
            let now = self.clock.now();
            let after = last_fired.map_or(now, |fired| fired.max(now));

            let boundary = match self.zone.next_midnight_after(after) {
                Ok(boundary) => boundary,
                Err(e) => {
                    error!(error = %e, "Cannot compute next reset boundary");
                    if self.wait_until(now + TimeDelta::hours(1), &mut stop_rx).await {
                        break;
                    }
                    continue;
                }
            };

            state_tx.send_replace(SchedulerState::Armed { next_reset: boundary });
            info!(next_reset = %boundary, zone = %self.zone, "Daily reset armed");

            if self.wait_until(boundary, &mut stop_rx).await {
                break;
            }

            state_tx.send_replace(SchedulerState::Firing { boundary });
            // Failures are already logged; the next boundary is armed either way.
            let _ = self.reset_now().await;
            last_fired = Some(boundary);
        }

        state_tx.send_replace(SchedulerState::Stopped);
        info!("Daily reset scheduler stopped");
    }

    /// Sleeps until `deadline`. Returns `true` if a stop was requested first.
    async fn wait_until(&self, deadline: DateTime<Utc>, stop_rx: &mut watch::Receiver<bool>) -> bool {
        if *stop_rx.borrow_and_update() {
            return true;
        }

        let delay = (deadline - self.clock.now()).to_std().unwrap_or(Duration::ZERO);
        let wake = Instant::now() + delay;

        loop {
            tokio::select! {
                _ = sleep_until(wake) => return false,
                changed = stop_rx.changed() => match changed {
                    Ok(()) if *stop_rx.borrow_and_update() => return true,
                    Ok(()) => continue,
                    Err(_) => {
                        // Handle dropped: nobody can stop us any more.
                        sleep_until(wake).await;
                        return false;
                    }
                },
            }
        }
    }
}

/// Control handle of a running [`DailyResetScheduler`].
pub struct ResetHandle {
    stop_tx: watch::Sender<bool>,
    state_rx: watch::Receiver<SchedulerState>,
    task: JoinHandle<()>,
}

impl ResetHandle {
    /// Requests a cooperative stop.
    ///
    /// Observed while the scheduler waits for its next boundary; a reset
    /// already in progress completes first.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    pub fn state(&self) -> SchedulerState {
        *self.state_rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state_rx.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Waits for the task to finish. Call [`Self::stop`] first.
    pub async fn join(self) -> Result<(), JoinError> {
        self.task.await
    }
}
