//! Per-item quality-of-experience accounting.
//!
//! Startup time and stall durations are measured locally from engine
//! notifications. Watched time, bitrate and stall counts come from the
//! engine's access log when the item ends.

use crate::events::PerformanceReport;
use crate::logging::targets;
use bridge_traits::media::AccessLogEvent;
use core_async::time::{Duration, Instant};
use tracing::info;

const SECONDS_PER_HOUR: f64 = 3600.0;
const BITS_PER_MEGABIT: f64 = 1_000_000.0;

#[derive(Debug)]
pub struct PerformanceAccumulator {
    created_at: Instant,
    playback_started_at: Option<Instant>,
    stall_started_at: Option<Instant>,
    total_stall_time: Duration,
    reported: bool,
}

impl PerformanceAccumulator {
    /// Starts measuring a freshly created engine item.
    pub fn new() -> Self {
        Self {
            created_at: Instant::now(),
            playback_started_at: None,
            stall_started_at: None,
            total_stall_time: Duration::ZERO,
            reported: false,
        }
    }

    pub fn rate_changed(&mut self, rate: f64) {
        if rate <= 0.0 {
            return;
        }
        if self.playback_started_at.is_none() {
            let now = Instant::now();
            self.playback_started_at = Some(now);
            info!(
                target: targets::SERVICE,
                startup_secs = (now - self.created_at).as_secs_f64(),
                "Playback started"
            );
        } else if self.stall_started_at.is_some() {
            self.stall_ended();
            info!(
                target: targets::SERVICE,
                total_stall_secs = self.total_stall_time.as_secs_f64(),
                "Playback resumed"
            );
        }
    }

    pub fn playback_stalled(&mut self) {
        info!(target: targets::SERVICE, "Playback stalled");
        self.stall_started_at = Some(Instant::now());
    }

    /// Closes the measurement and builds the report.
    ///
    /// Returns `None` if a report was already produced for this item.
    pub fn playback_ended(&mut self, access_log: &[AccessLogEvent]) -> Option<PerformanceReport> {
        if self.reported {
            return None;
        }
        self.stall_ended();
        self.reported = true;

        let report = summarize(access_log, self.startup_time(), self.total_stall_time);
        info!(
            target: targets::SERVICE,
            bitrate_mbps = report.time_weighted_bitrate_mbps,
            stalls_per_hour = report.stalls_per_hour,
            stall_wait_ratio = report.stall_wait_ratio,
            "Playback ended"
        );
        Some(report)
    }

    /// Delay between creation and the first positive rate, if playback
    /// started at all.
    pub fn startup_time(&self) -> Option<Duration> {
        self.playback_started_at
            .map(|started| started.saturating_duration_since(self.created_at))
    }

    pub fn total_stall_time(&self) -> Duration {
        self.total_stall_time
    }

    fn stall_ended(&mut self) {
        if let Some(started) = self.stall_started_at.take() {
            self.total_stall_time += Instant::now().saturating_duration_since(started);
        }
    }
}

impl Default for PerformanceAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a report from access-log entries and locally measured timings.
///
/// Ratios are zero when nothing was watched.
pub fn summarize(
    access_log: &[AccessLogEvent],
    startup_time: Option<Duration>,
    total_stall_time: Duration,
) -> PerformanceReport {
    let watched: f64 = access_log
        .iter()
        .map(|event| event.duration_watched)
        .filter(|watched| *watched > 0.0)
        .sum();

    let mut report = PerformanceReport {
        startup_time: startup_time.map_or(0.0, |startup| startup.as_secs_f64()),
        ..PerformanceReport::default()
    };
    if watched <= 0.0 {
        return report;
    }

    let weighted_bitrate: f64 = access_log
        .iter()
        .filter(|event| event.duration_watched > 0.0)
        .filter_map(|event| {
            let bitrate = if event.indicated_bitrate > 0.0 {
                event.indicated_bitrate
            } else if event.observed_bitrate > 0.0 {
                event.observed_bitrate
            } else {
                return None;
            };
            Some(bitrate * event.duration_watched / watched)
        })
        .sum();

    let stalls: u32 = access_log.iter().map(|event| event.number_of_stalls).sum();

    report.total_stalls = stalls;
    report.time_weighted_bitrate_mbps = weighted_bitrate / BITS_PER_MEGABIT;
    report.stalls_per_hour = f64::from(stalls) / (watched / SECONDS_PER_HOUR);
    report.stall_wait_ratio = total_stall_time.as_secs_f64() / watched;
    report
}
