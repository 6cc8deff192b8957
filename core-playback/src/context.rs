//! Session-wide data shared by every state.
//!
//! The context is owned by the session actor and lent mutably to the live
//! state for the duration of one call, so states never hold references back
//! into the session.

use crate::config::PlayerConfig;
use crate::events::PlayerEvent;
use crate::logging::targets;
use crate::performance::PerformanceAccumulator;
use crate::session::SessionMessage;
use crate::state::StateInput;
use crate::types::UnavailableActionReason;
use bridge_traits::audio_session::AudioSession;
use bridge_traits::http::HttpClient;
use bridge_traits::media::{MediaEngine, MediaItemId, MediaReference, SeekRequestId};
use core_async::sync::{mpsc, CancellationToken};
use core_runtime::events::EventBus;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Posts observer results back into the session mailbox, tagged with the
/// generation of the state that started the observer.
#[derive(Clone)]
pub(crate) struct Notifier {
    generation: u64,
    mailbox: mpsc::UnboundedSender<SessionMessage>,
}

impl Notifier {
    pub fn notify(&self, input: StateInput) {
        let message = SessionMessage::Signal {
            generation: self.generation,
            input,
        };
        if self.mailbox.send(message).is_err() {
            trace!(target: targets::SERVICE, "Session gone, dropping signal");
        }
    }
}

/// Lifetime of one installed state. Cancelling the token stops every timer
/// the state spawned.
struct StateScope {
    generation: u64,
    token: CancellationToken,
}

pub(crate) struct PlayerContext {
    pub session_id: Uuid,
    pub engine: Arc<dyn MediaEngine>,
    pub audio_session: Arc<dyn AudioSession>,
    pub http_client: Arc<dyn HttpClient>,
    pub config: Arc<PlayerConfig>,
    pub media: Option<MediaReference>,
    pub loop_mode: bool,
    pub performance: Option<PerformanceAccumulator>,
    events: EventBus<PlayerEvent>,
    failed_items: HashSet<MediaItemId>,
    mailbox: mpsc::UnboundedSender<SessionMessage>,
    scope: StateScope,
    next_seek: u64,
}

impl PlayerContext {
    pub fn new(
        engine: Arc<dyn MediaEngine>,
        audio_session: Arc<dyn AudioSession>,
        http_client: Arc<dyn HttpClient>,
        config: Arc<PlayerConfig>,
        events: EventBus<PlayerEvent>,
        mailbox: mpsc::UnboundedSender<SessionMessage>,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            loop_mode: config.loop_mode,
            engine,
            audio_session,
            http_client,
            config,
            media: None,
            performance: None,
            events,
            failed_items: HashSet::new(),
            mailbox,
            scope: StateScope {
                generation: 0,
                token: CancellationToken::new(),
            },
            next_seek: 0,
        }
    }

    pub fn emit(&self, event: PlayerEvent) {
        trace!(target: targets::SERVICE, event = %event.description(), "Emitting event");
        // Nobody listening is not an error.
        let _ = self.events.emit(event);
    }

    /// Reports a command that is not legal in the current state.
    pub fn reject(&self, reason: UnavailableActionReason) {
        warn!(target: targets::UNAVAILABLE_COMMAND, ?reason, "{}", reason.message());
        self.emit(PlayerEvent::UnavailableAction { reason });
    }

    pub fn emit_current_time(&self) {
        let duration = self.engine.duration();
        self.emit(PlayerEvent::CurrentTimeChanged {
            current_time: self.engine.current_time(),
            total_duration: duration.is_finite().then_some(duration),
        });
    }

    /// Records the engine's current item as unusable for the rest of the
    /// session.
    pub fn mark_current_item_failed(&mut self) {
        match self.engine.current_item() {
            Some(item) => {
                if self.failed_items.insert(item) {
                    debug!(target: targets::STATE, %item, "Item marked as failed");
                }
            }
            None => debug!(target: targets::STATE, "No current item to mark as failed"),
        }
    }

    pub fn is_failed(&self, item: &MediaItemId) -> bool {
        self.failed_items.contains(item)
    }

    pub fn failed_item_count(&self) -> usize {
        self.failed_items.len()
    }

    pub fn next_seek_request(&mut self) -> SeekRequestId {
        self.next_seek += 1;
        SeekRequestId(self.next_seek)
    }

    /// Emits the performance report of the current item, at most once.
    pub fn finish_performance(&mut self) {
        let Some(performance) = self.performance.as_mut() else {
            return;
        };
        if let Some(report) = performance.playback_ended(&self.engine.access_log()) {
            self.emit(PlayerEvent::PerformanceReport { report });
        }
    }

    /// Notifier bound to the live state.
    pub fn notifier(&self) -> Notifier {
        Notifier {
            generation: self.scope.generation,
            mailbox: self.mailbox.clone(),
        }
    }

    /// Token cancelled when the live state is replaced.
    pub fn scope_token(&self) -> CancellationToken {
        self.scope.token.clone()
    }

    pub fn generation(&self) -> u64 {
        self.scope.generation
    }

    /// Invalidates everything bound to the outgoing state and opens a new
    /// scope for the incoming one.
    pub fn begin_scope(&mut self) {
        self.scope.token.cancel();
        self.scope = StateScope {
            generation: self.scope.generation + 1,
            token: CancellationToken::new(),
        };
    }

    pub fn end_scope(&mut self) {
        self.scope.token.cancel();
    }
}
