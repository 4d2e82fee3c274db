//! Long-lived background jobs.

pub mod clock;
pub mod daily_reset;
pub mod schedule;

pub use clock::{Clock, SystemClock};
pub use daily_reset::{DailyResetScheduler, ResetHandle, RetryPolicy, SchedulerState};
pub use schedule::{ResetZone, ScheduleError};
