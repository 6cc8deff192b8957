use super::{LoadingState, PlayerState, Transition};
use crate::context::PlayerContext;
use crate::error::PlayerError;
use crate::events::PlayerEvent;
use crate::logging::targets;
use crate::types::{LoadRequest, PlayerStateKind, UnavailableActionReason};
use tracing::error;

/// Playback of the current item failed. Only `load` and `play` (a full
/// reload) lead out of here.
pub(crate) struct FailedState {
    error: PlayerError,
}

impl FailedState {
    pub fn new(error: PlayerError) -> Self {
        Self { error }
    }
}

impl PlayerState for FailedState {
    fn kind(&self) -> PlayerStateKind {
        PlayerStateKind::Failed
    }

    fn enter(&mut self, ctx: &mut PlayerContext) {
        error!(target: targets::ERROR, error = %self.error, session = %ctx.session_id, "Playback failed");
        ctx.mark_current_item_failed();
        ctx.emit(PlayerEvent::PlaybackFailed { error: self.error });
    }

    fn play(&mut self, ctx: &mut PlayerContext) -> Transition {
        debug_assert!(ctx.media.is_some(), "failed state without any loaded media");
        match ctx.media.clone() {
            Some(media) => Transition::to(LoadingState::reload(
                LoadRequest::new(media).autostart(true),
            )),
            None => {
                ctx.reject(UnavailableActionReason::LoadMediaFirst);
                Transition::Stay
            }
        }
    }

    fn pause(&mut self, ctx: &mut PlayerContext) -> Transition {
        ctx.reject(UnavailableActionReason::LoadMediaFirst);
        Transition::Stay
    }

    fn stop(&mut self, ctx: &mut PlayerContext) -> Transition {
        ctx.reject(UnavailableActionReason::LoadMediaFirst);
        Transition::Stay
    }

    fn seek(&mut self, ctx: &mut PlayerContext, _position: f64) -> Transition {
        ctx.reject(UnavailableActionReason::LoadMediaFirst);
        Transition::Stay
    }
}
