//! # Session Manager
//!
//! Application-facing handle of one playback session.
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::{PlayerConfig, SessionManager};
//! use bridge_traits::media::MediaReference;
//! use std::sync::Arc;
//!
//! let player = SessionManager::builder()
//!     .engine(engine)
//!     .audio_session(audio_session)
//!     .http_client(http_client)
//!     .config(PlayerConfig::default())
//!     .build()?;
//!
//! let mut events = player.event_stream();
//! player.load(MediaReference::new("https://cdn.example.com/show.m3u8"), true, None)?;
//! while let Ok(event) = events.recv().await {
//!     println!("{}", event.description());
//! }
//! ```
//!
//! Commands are fire-and-forget: they return as soon as the session actor
//! has queued them. Their effect is observed through events and
//! [`SessionManager::state`].

use crate::config::PlayerConfig;
use crate::context::PlayerContext;
use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::logging::targets;
use crate::session::{PlayerCommand, Session, SessionMessage};
use crate::types::{LoadRequest, PlayerStateKind};
use bridge_traits::audio_session::AudioSession;
use bridge_traits::http::HttpClient;
use bridge_traits::media::{MediaEngine, MediaReference};
use core_async::sync::{mpsc, watch};
use core_async::task::JoinHandle;
use core_runtime::events::{EventBus, EventStream, Receiver};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Handle to a running playback session.
///
/// Dropping the handle shuts the session down.
pub struct SessionManager {
    session_id: Uuid,
    mailbox: mpsc::UnboundedSender<SessionMessage>,
    events: EventBus<PlayerEvent>,
    state: watch::Receiver<PlayerStateKind>,
    task: Option<JoinHandle<()>>,
}

impl SessionManager {
    pub fn builder() -> SessionManagerBuilder {
        SessionManagerBuilder::default()
    }

    /// Loads `media`, replacing whatever was loaded before.
    ///
    /// With `autostart` playback begins once the item is ready. `position`
    /// is applied before buffering starts.
    pub fn load(&self, media: MediaReference, autostart: bool, position: Option<f64>) -> Result<()> {
        self.send(PlayerCommand::Load(LoadRequest {
            media,
            autostart,
            position,
        }))
    }

    pub fn load_request(&self, request: LoadRequest) -> Result<()> {
        self.send(PlayerCommand::Load(request))
    }

    pub fn play(&self) -> Result<()> {
        self.send(PlayerCommand::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(PlayerCommand::Pause)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(PlayerCommand::Stop)
    }

    /// Seeks to an absolute position in seconds.
    pub fn seek(&self, position: f64) -> Result<()> {
        self.send(PlayerCommand::Seek(position))
    }

    /// Seeks relative to the current position.
    pub fn seek_by(&self, offset: f64) -> Result<()> {
        self.send(PlayerCommand::SeekBy(offset))
    }

    pub fn set_loop_mode(&self, enabled: bool) -> Result<()> {
        self.send(PlayerCommand::SetLoopMode(enabled))
    }

    /// Current state, as of the last transition the session applied.
    pub fn state(&self) -> PlayerStateKind {
        *self.state.borrow()
    }

    /// Watch channel following the current state.
    pub fn watch_state(&self) -> watch::Receiver<PlayerStateKind> {
        self.state.clone()
    }

    pub fn subscribe(&self) -> Receiver<PlayerEvent> {
        self.events.subscribe()
    }

    pub fn event_stream(&self) -> EventStream<PlayerEvent> {
        self.events.stream()
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Stops the session and waits for the live state to be torn down.
    pub async fn shutdown(mut self) {
        let _ = self.mailbox.send(SessionMessage::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                debug!(target: targets::ERROR, %error, "Session task ended abnormally");
            }
        }
    }

    fn send(&self, command: PlayerCommand) -> Result<()> {
        self.mailbox
            .send(SessionMessage::Command(command))
            .map_err(|_| PlaybackError::SessionClosed)
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.mailbox.send(SessionMessage::Shutdown);
        }
    }
}

/// Builder for [`SessionManager`].
///
/// The media engine is always required. With the `desktop-shims` feature the
/// HTTP client and audio session fall back to the desktop implementations.
#[derive(Default)]
pub struct SessionManagerBuilder {
    engine: Option<Arc<dyn MediaEngine>>,
    audio_session: Option<Arc<dyn AudioSession>>,
    http_client: Option<Arc<dyn HttpClient>>,
    config: Option<PlayerConfig>,
}

impl SessionManagerBuilder {
    pub fn engine(mut self, engine: Arc<dyn MediaEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn audio_session(mut self, audio_session: Arc<dyn AudioSession>) -> Self {
        self.audio_session = Some(audio_session);
        self
    }

    pub fn http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn config(mut self, config: PlayerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Validates the configuration and spawns the session actor.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::CapabilityMissing`] when a collaborator is absent
    /// - [`PlaybackError::InvalidConfig`] when the configuration is rejected
    pub fn build(self) -> Result<SessionManager> {
        let config = self.config.unwrap_or_default();
        config.validate().map_err(PlaybackError::InvalidConfig)?;

        let engine = self.engine.ok_or_else(|| {
            PlaybackError::capability_missing(
                "MediaEngine",
                "A host media engine must be injected; there is no default implementation.",
            )
        })?;
        let audio_session = match self.audio_session {
            Some(audio_session) => audio_session,
            None => default_audio_session()?,
        };
        let http_client = match self.http_client {
            Some(http_client) => http_client,
            None => default_http_client()?,
        };

        let events = EventBus::new(config.event_buffer_size);
        let (mailbox_tx, mailbox_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PlayerStateKind::Initializing);

        let engine_events = engine.subscribe();
        let audio_events = audio_session.subscribe();

        let ctx = PlayerContext::new(
            engine,
            audio_session,
            http_client,
            Arc::new(config),
            events.clone(),
            mailbox_tx.clone(),
        );
        let session_id = ctx.session_id;
        let session = Session::new(ctx, state_tx);
        let task = core_async::spawn(session.run(mailbox_rx, engine_events, audio_events));

        info!(target: targets::STATE_LIFECYCLE, session = %session_id, "Session started");
        Ok(SessionManager {
            session_id,
            mailbox: mailbox_tx,
            events,
            state: state_rx,
            task: Some(task),
        })
    }
}

#[cfg(feature = "desktop-shims")]
fn default_audio_session() -> Result<Arc<dyn AudioSession>> {
    Ok(Arc::new(bridge_desktop::DesktopAudioSession::new()))
}

#[cfg(not(feature = "desktop-shims"))]
fn default_audio_session() -> Result<Arc<dyn AudioSession>> {
    Err(PlaybackError::capability_missing(
        "AudioSession",
        "AudioSession implementation is required for interruptions and route changes. \
         Desktop: enable the 'desktop-shims' feature to use DesktopAudioSession.",
    ))
}

#[cfg(feature = "desktop-shims")]
fn default_http_client() -> Result<Arc<dyn HttpClient>> {
    bridge_desktop::ReqwestHttpClient::new()
        .map(|client| Arc::new(client) as Arc<dyn HttpClient>)
        .map_err(|error| PlaybackError::capability_missing("HttpClient", error.to_string()))
}

#[cfg(not(feature = "desktop-shims"))]
fn default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(PlaybackError::capability_missing(
        "HttpClient",
        "HttpClient implementation is required for reachability probing. \
         Desktop: enable the 'desktop-shims' feature to use ReqwestHttpClient.",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detached_manager() -> SessionManager {
        let (mailbox, receiver) = mpsc::unbounded_channel();
        drop(receiver);
        let (_state_tx, state) = watch::channel(PlayerStateKind::Paused);
        SessionManager {
            session_id: Uuid::new_v4(),
            mailbox,
            events: EventBus::new(8),
            state,
            task: None,
        }
    }

    #[test]
    fn test_commands_fail_once_session_is_gone() {
        let manager = detached_manager();

        assert!(matches!(manager.play(), Err(PlaybackError::SessionClosed)));
        assert!(matches!(manager.seek(3.0), Err(PlaybackError::SessionClosed)));
        assert!(matches!(
            manager.load(MediaReference::new("https://cdn.example.com/a.m3u8"), true, None),
            Err(PlaybackError::SessionClosed)
        ));
    }

    #[test]
    fn test_state_reads_last_published_value() {
        let manager = detached_manager();
        assert_eq!(manager.state(), PlayerStateKind::Paused);
    }
}
