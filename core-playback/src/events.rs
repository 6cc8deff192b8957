//! # Player Events
//!
//! Everything the session tells the application travels as a [`PlayerEvent`]
//! on a `core_runtime::events::EventBus`. Subscribers that fall behind lose the
//! oldest events; state is always recoverable through
//! `SessionManager::state()`.

use crate::error::PlayerError;
use crate::types::{PlayerStateKind, UnavailableActionReason};
use bridge_traits::media::MediaReference;
use core_runtime::events::EventSeverity;
use serde::{Deserialize, Serialize};

/// Quality-of-experience figures for one played item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Seconds from item creation to the first positive playback rate.
    pub startup_time: f64,
    pub total_stalls: u32,
    /// Time-weighted indicated bitrate, in Mbps.
    pub time_weighted_bitrate_mbps: f64,
    pub stalls_per_hour: f64,
    /// Seconds stalled per second watched.
    pub stall_wait_ratio: f64,
}

/// Delegate-style notification published by a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum PlayerEvent {
    StateChanged {
        state: PlayerStateKind,
    },
    CurrentMediaChanged {
        media: Option<MediaReference>,
    },
    /// Seconds of media buffered ahead, from the first loaded range.
    BufferDurationChanged {
        duration: f64,
    },
    CurrentTimeChanged {
        current_time: f64,
        /// `None` while the duration is indeterminate.
        total_duration: Option<f64>,
    },
    UnavailableAction {
        reason: UnavailableActionReason,
    },
    ItemPlayedToEnd {
        end_time: f64,
    },
    PerformanceReport {
        report: PerformanceReport,
    },
    PlaybackFailed {
        error: PlayerError,
    },
}

impl PlayerEvent {
    pub fn description(&self) -> String {
        match self {
            PlayerEvent::StateChanged { state } => format!("State changed to {state}"),
            PlayerEvent::CurrentMediaChanged { media: Some(media) } => {
                format!("Current media changed ({media})")
            }
            PlayerEvent::CurrentMediaChanged { media: None } => {
                "Current media cleared".to_string()
            }
            PlayerEvent::BufferDurationChanged { duration } => {
                format!("Buffered {duration:.1}s ahead")
            }
            PlayerEvent::CurrentTimeChanged {
                current_time,
                total_duration,
            } => match total_duration {
                Some(total) => format!("Time {current_time:.1}s / {total:.1}s"),
                None => format!("Time {current_time:.1}s"),
            },
            PlayerEvent::UnavailableAction { reason } => format!("Unavailable action: {reason}"),
            PlayerEvent::ItemPlayedToEnd { end_time } => {
                format!("Item played to end at {end_time:.1}s")
            }
            PlayerEvent::PerformanceReport { report } => format!(
                "Performance: startup {:.2}s, {} stalls, {:.2} Mbps",
                report.startup_time, report.total_stalls, report.time_weighted_bitrate_mbps
            ),
            PlayerEvent::PlaybackFailed { error } => format!("Playback failed: {error}"),
        }
    }

    pub fn severity(&self) -> EventSeverity {
        match self {
            PlayerEvent::CurrentTimeChanged { .. } | PlayerEvent::BufferDurationChanged { .. } => {
                EventSeverity::Debug
            }
            PlayerEvent::StateChanged { .. }
            | PlayerEvent::CurrentMediaChanged { .. }
            | PlayerEvent::ItemPlayedToEnd { .. }
            | PlayerEvent::PerformanceReport { .. } => EventSeverity::Info,
            PlayerEvent::UnavailableAction { .. } => EventSeverity::Warning,
            PlayerEvent::PlaybackFailed { .. } => EventSeverity::Error,
        }
    }
}
