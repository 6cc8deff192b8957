//! Host Audio Session Abstraction
//!
//! Interruptions (a phone call, another app taking exclusive audio) and
//! route changes (headphones unplugged) come from the host audio subsystem.
//! The playback core only needs a stream of these signals plus one hint about
//! how other audio is being treated.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Why the audio route changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteChangeReason {
    Unknown,
    NewDeviceAvailable,
    OldDeviceUnavailable,
    CategoryChange,
    Override,
    WakeFromSleep,
    NoSuitableRouteForCategory,
    RouteConfigurationChange,
}

impl RouteChangeReason {
    /// Returns `true` when the change means the listener lost their output
    /// device (or the host cannot tell), so playback should not continue.
    pub fn should_pause_playback(&self) -> bool {
        matches!(
            self,
            RouteChangeReason::OldDeviceUnavailable | RouteChangeReason::Unknown
        )
    }
}

/// Notification published by the host audio session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum AudioSessionEvent {
    InterruptionBegan,
    /// `should_resume` is the host's own hint; the core applies its own
    /// resume policy on top of it.
    InterruptionEnded { should_resume: bool },
    RouteChanged { reason: RouteChangeReason },
}

/// Stream of audio session notifications.
#[async_trait]
pub trait AudioSessionEventStream: Send {
    /// Returns `None` when the host stops publishing. Must be cancel safe.
    async fn next(&mut self) -> Option<AudioSessionEvent>;
}

/// Host audio session trait
///
/// # Platform Support
///
/// - **iOS**: `AVAudioSession` interruption and route-change notifications
/// - **Android**: audio focus changes and `ACTION_AUDIO_BECOMING_NOISY`
/// - **Desktop**: usually no interruptions; routes driven by the host
pub trait AudioSession: Send + Sync {
    /// Subscribe to interruption and route-change notifications.
    fn subscribe(&self) -> Box<dyn AudioSessionEventStream>;

    /// Whether other audio currently playing should be silenced (exclusive
    /// audio) rather than ducked.
    fn secondary_audio_should_be_silenced(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_lost_or_unknown_routes_pause() {
        assert!(RouteChangeReason::OldDeviceUnavailable.should_pause_playback());
        assert!(RouteChangeReason::Unknown.should_pause_playback());
        assert!(!RouteChangeReason::NewDeviceAvailable.should_pause_playback());
        assert!(!RouteChangeReason::CategoryChange.should_pause_playback());
        assert!(!RouteChangeReason::WakeFromSleep.should_pause_playback());
    }
}
