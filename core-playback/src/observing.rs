//! Helpers for observing an item while it plays.

use crate::context::Notifier;
use crate::logging::targets;
use crate::state::StateInput;
use bridge_traits::media::TimeRange;
use core_async::sync::CancellationToken;
use core_async::time::{ticker, Duration, FirstTick};
use tracing::{debug, trace};

/// How an end-of-item notification should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    /// The position really is at the end of the item.
    Reached,
    /// The engine reported an end that the position does not back up.
    Premature,
}

impl PlaybackEnd {
    /// Classifies an end-of-item notification.
    ///
    /// The end is genuine when `current_time + tolerance` reaches the
    /// duration. An indeterminate (NaN) duration never has a genuine end.
    pub fn classify(current_time: f64, duration: f64, tolerance: Duration) -> Self {
        if current_time + tolerance.as_secs_f64() >= duration {
            PlaybackEnd::Reached
        } else {
            PlaybackEnd::Premature
        }
    }
}

/// Seconds buffered ahead, taken from the first loaded range.
pub fn forward_buffer(ranges: &[TimeRange]) -> Option<f64> {
    ranges.first().map(|range| range.duration)
}

/// Posts [`StateInput::PeriodicTick`] every `period` until `scope` is
/// cancelled. The first tick arrives one period after the call.
pub(crate) fn spawn_periodic_time(period: Duration, notifier: Notifier, scope: CancellationToken) {
    debug!(target: targets::SERVICE_LIFECYCLE, ?period, "Periodic time observer started");
    core_async::spawn(async move {
        let mut ticks = ticker(period, FirstTick::AfterPeriod);
        loop {
            core_async::select! {
                _ = scope.cancelled() => break,
                _ = ticks.tick() => {
                    trace!(target: targets::SERVICE, "Periodic time tick");
                    notifier.notify(StateInput::PeriodicTick);
                }
            }
        }
        debug!(target: targets::SERVICE_LIFECYCLE, "Periodic time observer stopped");
    });
}
