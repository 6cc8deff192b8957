//! Time-related operations.
//!
//! All timers are Tokio timers, so tests can freeze and advance the clock with
//! `#[tokio::test(start_paused = true)]`. [`Instant`] is Tokio's instant for the
//! same reason: elapsed-time measurements follow the virtual clock in tests.
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{sleep, Duration, Instant};
//!
//! async fn example() {
//!     let start = Instant::now();
//!     sleep(Duration::from_millis(10)).await;
//!     assert!(start.elapsed() >= Duration::from_millis(10));
//! }
//! ```

pub use std::time::Duration;
pub use tokio::time::{
    interval, interval_at, sleep, sleep_until, timeout, Instant, Interval, MissedTickBehavior,
    Sleep, Timeout,
};

/// When the first tick of a [`ticker`] completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstTick {
    /// The first tick completes as soon as it is awaited.
    Immediate,
    /// The first tick completes one full period after creation.
    AfterPeriod,
}

/// Creates a recurring timer with the given period.
///
/// Missed ticks are delayed rather than bursted: a ticker that falls behind
/// never fires several ticks back to back to catch up.
///
/// # Panics
///
/// Panics if `period` is zero, like [`interval`].
pub fn ticker(period: Duration, first: FirstTick) -> Interval {
    let start = match first {
        FirstTick::Immediate => Instant::now(),
        FirstTick::AfterPeriod => Instant::now() + period,
    };
    let mut ticks = interval_at(start, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticks
}
