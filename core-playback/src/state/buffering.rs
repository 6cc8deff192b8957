//! Buffering: the item is ready and the session waits for the engine to
//! actually make progress.

use super::{PausedState, PlayerState, PlayingState, StateInput, Transition, WaitingForNetworkState};
use crate::context::PlayerContext;
use crate::error::PlayerError;
use crate::logging::targets;
use crate::stall::{StallEvent, StallObserver};
use crate::types::PlayerStateKind;
use bridge_traits::audio_session::AudioSessionEvent;
use bridge_traits::media::{EngineEvent, SeekRequestId};
use tracing::debug;

pub(crate) struct BufferingState {
    observer: Option<StallObserver>,
    pending_seek: Option<SeekRequestId>,
}

impl BufferingState {
    pub fn new() -> Self {
        Self {
            observer: None,
            pending_seek: None,
        }
    }

    fn teardown(&mut self, ctx: &PlayerContext) {
        if let Some(observer) = self.observer.as_mut() {
            observer.stop(true);
        }
        self.pending_seek = None;
        ctx.engine.cancel_pending_seeks();
    }
}

impl PlayerState for BufferingState {
    fn kind(&self) -> PlayerStateKind {
        PlayerStateKind::Buffering
    }

    fn enter(&mut self, ctx: &mut PlayerContext) {
        let engine = ctx.engine.clone();
        let mut observer = StallObserver::new(
            ctx.config.stall_timeout,
            ctx.config.stall_tick,
            move || engine.playback_rate(),
        );
        let notifier = ctx.notifier();
        observer.on_event(move |event| notifier.notify(StateInput::Stall(event)));
        self.observer = Some(observer);
    }

    fn exit(&mut self, ctx: &mut PlayerContext) {
        self.teardown(ctx);
    }

    fn play(&mut self, ctx: &mut PlayerContext) -> Transition {
        if let Some(observer) = self.observer.as_mut() {
            observer.start();
        }
        ctx.engine.play();
        Transition::Stay
    }

    fn pause(&mut self, _ctx: &mut PlayerContext) -> Transition {
        Transition::to(PausedState::paused())
    }

    fn stop(&mut self, _ctx: &mut PlayerContext) -> Transition {
        Transition::to(PausedState::stopped())
    }

    /// Only the most recent seek is honored: earlier ones are cancelled and
    /// their completions ignored.
    fn seek(&mut self, ctx: &mut PlayerContext, position: f64) -> Transition {
        ctx.engine.cancel_pending_seeks();
        let request = ctx.next_seek_request();
        self.pending_seek = Some(request);
        debug!(target: targets::STATE, position, ?request, "Seeking while buffering");
        ctx.engine.seek(position, request);
        Transition::Stay
    }

    fn on_input(&mut self, ctx: &mut PlayerContext, input: StateInput) -> Transition {
        match input {
            StateInput::Stall(StallEvent::Playing) => Transition::to(PlayingState::new()),
            StateInput::Stall(StallEvent::Timeout) => {
                Transition::to(WaitingForNetworkState::new(PlayerError::BufferingFailed))
            }
            StateInput::Engine(EngineEvent::SeekCompleted { request, finished })
                if Some(request) == self.pending_seek =>
            {
                self.pending_seek = None;
                if finished {
                    ctx.emit_current_time();
                    self.play(ctx)
                } else {
                    Transition::Stay
                }
            }
            StateInput::Audio(AudioSessionEvent::InterruptionBegan) => self.pause(ctx),
            _ => Transition::Stay,
        }
    }
}
