//! Media engine bridge trait and supporting value types.
//!
//! The media engine is the opaque, host-supplied player that actually decodes
//! and renders media. The playback core never talks to a platform API
//! directly; it drives this trait and reacts to the [`EngineEvent`]s the
//! engine publishes.
//!
//! ## Calling convention
//!
//! Every method is synchronous and must return promptly. Work that takes time
//! (asset loading, seeking) is started by the call and reported later through
//! the event stream returned by [`MediaEngine::subscribe`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Caller-supplied description of something to play.
///
/// Immutable once created. A new `load` replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaReference {
    /// Location of the media, usually an HTTP(S) or file URI.
    pub uri: String,
    /// Engine-specific asset options, passed through untouched.
    #[serde(default)]
    pub options: HashMap<String, String>,
    /// Engine item the caller already prepared for this media, if any.
    ///
    /// The core uses it for the first load only while it has not failed;
    /// afterwards a fresh item is created.
    #[serde(default)]
    pub prepared_item: Option<MediaItemId>,
}

impl MediaReference {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            options: HashMap::new(),
            prepared_item: None,
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn with_prepared_item(mut self, item: MediaItemId) -> Self {
        self.prepared_item = Some(item);
        self
    }
}

impl fmt::Display for MediaReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uri: {}", self.uri)
    }
}

/// Identifier of one engine-internal playable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaItemId(Uuid);

impl MediaItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MediaItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MediaItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Correlates a seek with its completion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeekRequestId(pub u64);

/// Readiness of an engine item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    Unknown,
    ReadyToPlay,
    Failed,
}

/// Whether the engine is currently playing, waiting, or paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeControlStatus {
    Paused,
    WaitingToPlayAtSpecifiedRate,
    Playing,
}

/// Half-open time interval `[start, start + duration)`, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub duration: f64,
}

impl TimeRange {
    pub fn new(start: f64, duration: f64) -> Self {
        Self { start, duration }
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn contains(&self, position: f64) -> bool {
        position >= self.start && position < self.end()
    }
}

/// One entry of the engine's access log for the current item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AccessLogEvent {
    /// Seconds of media watched during this event.
    pub duration_watched: f64,
    /// Bitrate the stream advertised, in bits per second. Zero when unknown.
    pub indicated_bitrate: f64,
    /// Bitrate actually observed, in bits per second. Zero when unknown.
    pub observed_bitrate: f64,
    pub number_of_stalls: u32,
}

/// Notifications published by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum EngineEvent {
    /// Status of an item changed. Only events for the current item matter.
    ItemStatusChanged { item: MediaItemId, status: ItemStatus },
    /// A seek finished. `finished` is false when it was interrupted.
    SeekCompleted { request: SeekRequestId, finished: bool },
    /// Playback ran out of data.
    PlaybackStalled,
    /// Playback stopped before the end of the item.
    FailedToPlayToEnd,
    /// Playback reached the end of the item.
    PlayedToEnd,
    /// Loaded (buffered) ranges of the current item changed.
    LoadedRangesChanged { ranges: Vec<TimeRange> },
    /// Effective playback rate of the item's timebase changed.
    RateChanged { rate: f64 },
    TimeControlStatusChanged { status: TimeControlStatus },
}

/// Stream of engine notifications.
#[async_trait]
pub trait EngineEventStream: Send {
    /// Get the next engine event.
    ///
    /// Returns `None` when the engine has shut down. Must be cancel safe: a
    /// dropped call must not lose an event.
    async fn next(&mut self) -> Option<EngineEvent>;
}

/// Host media engine driven by the playback core.
///
/// # Thread safety
///
/// The core issues commands from a single control task, but observers read
/// [`MediaEngine::playback_rate`] from timer tasks, so implementations must be
/// `Send + Sync`.
pub trait MediaEngine: Send + Sync {
    /// Apply the engine defaults the core relies on (no automatic stall
    /// minimization, no external playback).
    fn configure_defaults(&self);

    /// Create a brand-new item for `media`. Never returns a previously
    /// returned identifier.
    fn create_item(&self, media: &MediaReference) -> MediaItemId;

    /// Make `item` the current item, or clear it with `None`.
    ///
    /// The engine reports [`EngineEvent::ItemStatusChanged`] for the new item
    /// once its status is known, immediately if it already is.
    fn replace_current_item(&self, item: Option<MediaItemId>);

    fn current_item(&self) -> Option<MediaItemId>;

    /// Status of the current item, `Unknown` when there is none.
    fn item_status(&self) -> ItemStatus;

    /// Abandon asynchronous asset loading of the current item.
    fn cancel_loading(&self);

    fn play(&self);

    fn pause(&self);

    /// Start seeking the current item. Completion is reported with
    /// [`EngineEvent::SeekCompleted`] carrying the same `request`.
    fn seek(&self, position: f64, request: SeekRequestId);

    /// Cancel every seek still in flight. Each one completes with
    /// `finished == false`.
    fn cancel_pending_seeks(&self);

    /// Effective rate of the current item's timebase, `None` while the item
    /// has no timebase yet.
    fn playback_rate(&self) -> Option<f64>;

    /// Current position in seconds.
    fn current_time(&self) -> f64;

    /// Duration in seconds. NaN while unknown or for live content.
    fn duration(&self) -> f64;

    fn seekable_ranges(&self) -> Vec<TimeRange>;

    fn loaded_ranges(&self) -> Vec<TimeRange>;

    /// Access log of the current item.
    fn access_log(&self) -> Vec<AccessLogEvent>;

    /// Subscribe to engine notifications.
    fn subscribe(&self) -> Box<dyn EngineEventStream>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_range_is_half_open() {
        let range = TimeRange::new(10.0, 5.0);
        assert!(range.contains(10.0));
        assert!(range.contains(14.999));
        assert!(!range.contains(15.0));
        assert!(!range.contains(9.999));
        assert_eq!(range.end(), 15.0);
    }

    #[test]
    fn media_item_ids_are_unique() {
        let a = MediaItemId::new();
        let b = MediaItemId::new();
        assert_ne!(a, b);
        assert_eq!(a, MediaItemId::from_uuid(*a.as_uuid()));
    }

    #[test]
    fn media_reference_builder() {
        let item = MediaItemId::new();
        let media = MediaReference::new("https://cdn.example.com/live.m3u8")
            .with_option("prefers_precise_duration", "true")
            .with_prepared_item(item);

        assert_eq!(media.prepared_item, Some(item));
        assert_eq!(
            media.options.get("prefers_precise_duration").map(String::as_str),
            Some("true")
        );
        assert_eq!(media.to_string(), "uri: https://cdn.example.com/live.m3u8");
    }
}
