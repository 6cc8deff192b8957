//! Paused and Stopped.
//!
//! Stopped is a Paused that rewinds to the start on entry and swaps the
//! meaning of `pause` and `stop`.

use super::{BufferingState, LoadingState, PlayerState, StateInput, Transition};
use crate::context::PlayerContext;
use crate::logging::targets;
use crate::types::{LoadRequest, PlayerStateKind, UnavailableActionReason};
use bridge_traits::audio_session::AudioSessionEvent;
use bridge_traits::media::{EngineEvent, ItemStatus, SeekRequestId};
use tracing::debug;

pub(crate) struct PausedState {
    kind: PlayerStateKind,
    resume_on_interruption_end: bool,
    pending_seek: Option<SeekRequestId>,
}

impl PausedState {
    pub fn paused() -> Self {
        Self {
            kind: PlayerStateKind::Paused,
            resume_on_interruption_end: false,
            pending_seek: None,
        }
    }

    pub fn stopped() -> Self {
        Self {
            kind: PlayerStateKind::Stopped,
            ..Self::paused()
        }
    }

    pub fn resume_on_interruption_end(mut self, resume: bool) -> Self {
        self.resume_on_interruption_end = resume;
        self
    }

    fn is_stopped(&self) -> bool {
        self.kind == PlayerStateKind::Stopped
    }

    fn seek_engine(&mut self, ctx: &mut PlayerContext, position: f64) {
        let request = ctx.next_seek_request();
        self.pending_seek = Some(request);
        ctx.engine.seek(position, request);
    }
}

impl PlayerState for PausedState {
    fn kind(&self) -> PlayerStateKind {
        self.kind
    }

    fn enter(&mut self, ctx: &mut PlayerContext) {
        ctx.engine.pause();
        if self.is_stopped() {
            self.seek_engine(ctx, 0.0);
        }
    }

    fn play(&mut self, ctx: &mut PlayerContext) -> Transition {
        if ctx.engine.item_status() == ItemStatus::ReadyToPlay {
            return Transition::to_then_play(BufferingState::new());
        }
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
        if self.is_stopped() {
            Transition::to(PausedState::paused())
        } else {
            ctx.reject(UnavailableActionReason::AlreadyPaused);
            Transition::Stay
        }
    }

    fn stop(&mut self, ctx: &mut PlayerContext) -> Transition {
        if self.is_stopped() {
            ctx.reject(UnavailableActionReason::AlreadyStopped);
            Transition::Stay
        } else {
            Transition::to(PausedState::stopped())
        }
    }

    fn seek(&mut self, ctx: &mut PlayerContext, position: f64) -> Transition {
        self.seek_engine(ctx, position);
        Transition::Stay
    }

    fn on_input(&mut self, ctx: &mut PlayerContext, input: StateInput) -> Transition {
        match input {
            StateInput::Engine(EngineEvent::SeekCompleted { request, finished })
                if Some(request) == self.pending_seek =>
            {
                self.pending_seek = None;
                if finished {
                    ctx.emit_current_time();
                }
                Transition::Stay
            }
            StateInput::Audio(AudioSessionEvent::InterruptionEnded { .. })
                if self.resume_on_interruption_end =>
            {
                debug!(target: targets::STATE, "Interruption ended, resuming");
                self.resume_on_interruption_end = false;
                self.play(ctx)
            }
            _ => Transition::Stay,
        }
    }
}
