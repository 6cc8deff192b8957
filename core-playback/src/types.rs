//! Value types shared by the state machine and the public API.

use bridge_traits::media::MediaReference;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant of the live playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerStateKind {
    Initializing,
    Loading,
    Buffering,
    Playing,
    Paused,
    Stopped,
    Failed,
    WaitingForNetwork,
}

impl PlayerStateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerStateKind::Initializing => "initializing",
            PlayerStateKind::Loading => "loading",
            PlayerStateKind::Buffering => "buffering",
            PlayerStateKind::Playing => "playing",
            PlayerStateKind::Paused => "paused",
            PlayerStateKind::Stopped => "stopped",
            PlayerStateKind::Failed => "failed",
            PlayerStateKind::WaitingForNetwork => "waitingForNetwork",
        }
    }
}

impl fmt::Display for PlayerStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a command was ignored.
///
/// Command misuse never changes the state; the reason is published as an
/// `UnavailableAction` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnavailableActionReason {
    AlreadyPaused,
    AlreadyPlaying,
    AlreadyStopped,
    AlreadyTryingToPlay,
    SeekPositionNotAvailable,
    LoadMediaFirst,
    SeekOverstepPosition,
    WaitEstablishedNetwork,
    WaitLoadedMedia,
}

impl UnavailableActionReason {
    /// Human readable explanation, used for logs.
    pub fn message(&self) -> &'static str {
        match self {
            UnavailableActionReason::AlreadyPaused => "Already paused",
            UnavailableActionReason::AlreadyPlaying => "Already playing",
            UnavailableActionReason::AlreadyStopped => "Already stopped",
            UnavailableActionReason::AlreadyTryingToPlay => "Already trying to play",
            UnavailableActionReason::SeekPositionNotAvailable => "Seek position not available",
            UnavailableActionReason::LoadMediaFirst => "Load a media first",
            UnavailableActionReason::SeekOverstepPosition => {
                "Seek position should not exceed item end position"
            }
            UnavailableActionReason::WaitEstablishedNetwork => {
                "Wait for the network to be established"
            }
            UnavailableActionReason::WaitLoadedMedia => "Wait for the media to be loaded",
        }
    }
}

impl fmt::Display for UnavailableActionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Arguments of a `load` command.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    pub media: MediaReference,
    /// Start playing as soon as the item is ready.
    pub autostart: bool,
    /// Position to seek to once the item is ready.
    pub position: Option<f64>,
}

impl LoadRequest {
    pub fn new(media: MediaReference) -> Self {
        Self {
            media,
            autostart: false,
            position: None,
        }
    }

    pub fn autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }

    pub fn at_position(mut self, position: f64) -> Self {
        self.position = Some(position);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_wire_names() {
        let json = serde_json::to_string(&UnavailableActionReason::WaitLoadedMedia).unwrap();
        assert_eq!(json, r#""waitLoadedMedia""#);
        let json = serde_json::to_string(&UnavailableActionReason::SeekOverstepPosition).unwrap();
        assert_eq!(json, r#""seekOverstepPosition""#);
    }

    #[test]
    fn test_state_kind_display() {
        assert_eq!(PlayerStateKind::WaitingForNetwork.to_string(), "waitingForNetwork");
        let json = serde_json::to_string(&PlayerStateKind::Playing).unwrap();
        assert_eq!(json, r#""playing""#);
    }

    #[test]
    fn test_load_request_builder() {
        let request = LoadRequest::new(MediaReference::new("https://example.com/a.m3u8"))
            .autostart(true)
            .at_position(12.5);
        assert!(request.autostart);
        assert_eq!(request.position, Some(12.5));
    }
}
