//! # Playback Error Types
//!
//! Two families live here:
//!
//! - [`PlayerError`] is the runtime failure taxonomy. It travels inside the
//!   Failed state and the `PlaybackFailed` event, so it is cheap to clone and
//!   serializable.
//! - [`PlaybackError`] is what the public API returns. Command misuse is never
//!   an error; it is reported as an `UnavailableAction` event instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why playback of the current item failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerError {
    /// The engine reported the item as failed while loading it.
    #[error("Loading failed")]
    LoadingFailed,

    /// Playback stalled and could not recover.
    #[error("Playback stalled")]
    PlaybackStalled,

    /// Buffering did not reach a playing rate in time and the network never
    /// came back.
    #[error("Buffering failed")]
    BufferingFailed,
}

impl PlayerError {
    /// Returns `true` if the failure was caused by the network rather than
    /// the media itself.
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            PlayerError::PlaybackStalled | PlayerError::BufferingFailed
        )
    }
}

/// Errors returned by the session API.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The session actor has shut down; commands can no longer be delivered.
    #[error("Playback session is closed")]
    SessionClosed,

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A required collaborator was not supplied to the builder.
    #[error("Required capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

impl PlaybackError {
    pub(crate) fn capability_missing(
        capability: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        PlaybackError::CapabilityMissing {
            capability: capability.into(),
            message: message.into(),
        }
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_error_serializes_camel_case() {
        let json = serde_json::to_string(&PlayerError::BufferingFailed).unwrap();
        assert_eq!(json, r#""bufferingFailed""#);
    }

    #[test]
    fn test_network_classification() {
        assert!(PlayerError::BufferingFailed.is_network_error());
        assert!(PlayerError::PlaybackStalled.is_network_error());
        assert!(!PlayerError::LoadingFailed.is_network_error());
    }

    #[test]
    fn test_playback_error_messages() {
        let err = PlaybackError::capability_missing("MediaEngine", "inject the host player");
        assert_eq!(
            err.to_string(),
            "Required capability missing: MediaEngine - inject the host player"
        );

        let err: PlaybackError = core_runtime::Error::LoggingInstall("already installed".into()).into();
        assert!(matches!(err, PlaybackError::Runtime(_)));
    }
}
