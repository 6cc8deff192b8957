//! # Player Configuration
//!
//! Immutable settings handed to the session at construction. Every field has a
//! serde default, so hosts can deserialize a partial document.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session-wide playback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// How long Buffering waits for a non-zero playback rate before giving up
    /// and waiting for the network.
    ///
    /// Default: 3 seconds.
    #[serde(default = "default_stall_timeout")]
    pub stall_timeout: Duration,

    /// Sampling period of the stall observer.
    ///
    /// Default: 300 ms.
    #[serde(default = "default_stall_tick")]
    pub stall_tick: Duration,

    /// Period of `CurrentTimeChanged` updates while playing.
    ///
    /// Default: 1 second.
    #[serde(default = "default_periodic_time_interval")]
    pub periodic_time_interval: Duration,

    /// Endpoint probed while waiting for the network.
    ///
    /// Default: `https://www.google.com`.
    #[serde(default = "default_reachability_url")]
    pub reachability_url: String,

    /// Upper bound for a single probe request.
    ///
    /// Default: 3 seconds.
    #[serde(default = "default_reachability_request_timeout")]
    pub reachability_request_timeout: Duration,

    /// Period between probe requests.
    ///
    /// Default: 3 seconds.
    #[serde(default = "default_reachability_tick")]
    pub reachability_tick: Duration,

    /// Number of probe requests issued before the session fails.
    ///
    /// Default: 10.
    #[serde(default = "default_reachability_iterations")]
    pub reachability_iterations: u32,

    /// Slack allowed between the current time and the duration when the
    /// engine reports the end of an item.
    ///
    /// Default: 1 second.
    #[serde(default = "default_end_of_item_tolerance")]
    pub end_of_item_tolerance: Duration,

    /// Capacity of the broadcast channel behind the event stream.
    ///
    /// Default: 100.
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,

    /// Initial loop-mode flag.
    ///
    /// Default: false.
    #[serde(default)]
    pub loop_mode: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            stall_timeout: default_stall_timeout(),
            stall_tick: default_stall_tick(),
            periodic_time_interval: default_periodic_time_interval(),
            reachability_url: default_reachability_url(),
            reachability_request_timeout: default_reachability_request_timeout(),
            reachability_tick: default_reachability_tick(),
            reachability_iterations: default_reachability_iterations(),
            end_of_item_tolerance: default_end_of_item_tolerance(),
            event_buffer_size: default_event_buffer_size(),
            loop_mode: false,
        }
    }
}

impl PlayerConfig {
    /// Create a configuration that reacts faster to bad networks.
    ///
    /// - Shorter stall timeout (1.5s)
    /// - Probe every second
    pub fn low_latency() -> Self {
        Self {
            stall_timeout: Duration::from_millis(1500),
            reachability_tick: Duration::from_secs(1),
            reachability_request_timeout: Duration::from_secs(1),
            ..Default::default()
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        let durations = [
            ("stall_timeout", self.stall_timeout),
            ("stall_tick", self.stall_tick),
            ("periodic_time_interval", self.periodic_time_interval),
            (
                "reachability_request_timeout",
                self.reachability_request_timeout,
            ),
            ("reachability_tick", self.reachability_tick),
        ];
        for (name, value) in durations {
            if value.is_zero() {
                return Err(format!("{name} must be > 0"));
            }
        }

        if self.stall_tick > self.stall_timeout {
            return Err("stall_tick cannot exceed stall_timeout".to_string());
        }

        if !(self.reachability_url.starts_with("http://")
            || self.reachability_url.starts_with("https://"))
        {
            return Err("reachability_url must be an http(s) URL".to_string());
        }

        if self.reachability_iterations == 0 {
            return Err("reachability_iterations must be > 0".to_string());
        }

        if self.event_buffer_size == 0 {
            return Err("event_buffer_size must be > 0".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Default Functions (for serde)
// ============================================================================

fn default_stall_timeout() -> Duration {
    Duration::from_secs(3)
}

fn default_stall_tick() -> Duration {
    Duration::from_millis(300)
}

fn default_periodic_time_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_reachability_url() -> String {
    "https://www.google.com".to_string()
}

fn default_reachability_request_timeout() -> Duration {
    Duration::from_secs(3)
}

fn default_reachability_tick() -> Duration {
    Duration::from_secs(3)
}

fn default_reachability_iterations() -> u32 {
    10
}

fn default_end_of_item_tolerance() -> Duration {
    Duration::from_secs(1)
}

fn default_event_buffer_size() -> usize {
    core_runtime::events::DEFAULT_EVENT_BUFFER_SIZE
}
