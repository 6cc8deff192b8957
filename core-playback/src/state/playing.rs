//! Playing: the engine is making progress.

use super::{BufferingState, PausedState, PlayerState, StateInput, Transition};
use crate::context::PlayerContext;
use crate::events::PlayerEvent;
use crate::logging::targets;
use crate::observing::{forward_buffer, spawn_periodic_time, PlaybackEnd};
use crate::types::{PlayerStateKind, UnavailableActionReason};
use bridge_traits::audio_session::{AudioSessionEvent, RouteChangeReason};
use bridge_traits::media::EngineEvent;
use tracing::debug;

pub(crate) struct PlayingState;

impl PlayingState {
    pub fn new() -> Self {
        Self
    }

    fn redirect_to_buffering(&self) -> Transition {
        Transition::to_then_play(BufferingState::new())
    }

    fn played_to_end(&mut self, ctx: &mut PlayerContext) -> Transition {
        let current_time = ctx.engine.current_time();
        let end = PlaybackEnd::classify(
            current_time,
            ctx.engine.duration(),
            ctx.config.end_of_item_tolerance,
        );
        if end == PlaybackEnd::Premature {
            debug!(target: targets::SERVICE, current_time, "End reported before the end of the item");
            return self.redirect_to_buffering();
        }

        ctx.emit(PlayerEvent::ItemPlayedToEnd {
            end_time: current_time,
        });
        ctx.finish_performance();

        if ctx.loop_mode {
            self.seek(ctx, 0.0)
        } else {
            self.stop(ctx)
        }
    }

    /// Pauses for an interruption. Playback resumes when it ends only if
    /// other audio is ducked rather than silenced.
    fn pause_by_interruption(&self, ctx: &PlayerContext) -> Transition {
        let resume = !ctx.audio_session.secondary_audio_should_be_silenced();
        debug!(target: targets::STATE, resume, "Interruption began");
        Transition::to(PausedState::paused().resume_on_interruption_end(resume))
    }

    fn route_changed(&self, reason: RouteChangeReason) -> Transition {
        if reason.should_pause_playback() {
            debug!(target: targets::STATE, ?reason, "Audio route lost");
            Transition::to(PausedState::paused())
        } else {
            Transition::Stay
        }
    }
}

impl PlayerState for PlayingState {
    fn kind(&self) -> PlayerStateKind {
        PlayerStateKind::Playing
    }

    fn enter(&mut self, ctx: &mut PlayerContext) {
        spawn_periodic_time(
            ctx.config.periodic_time_interval,
            ctx.notifier(),
            ctx.scope_token(),
        );
    }

    fn play(&mut self, ctx: &mut PlayerContext) -> Transition {
        ctx.reject(UnavailableActionReason::AlreadyPlaying);
        Transition::Stay
    }

    fn pause(&mut self, _ctx: &mut PlayerContext) -> Transition {
        Transition::to(PausedState::paused())
    }

    fn stop(&mut self, _ctx: &mut PlayerContext) -> Transition {
        Transition::to(PausedState::stopped())
    }

    fn seek(&mut self, _ctx: &mut PlayerContext, position: f64) -> Transition {
        Transition::to_then_seek(BufferingState::new(), position)
    }

    fn on_input(&mut self, ctx: &mut PlayerContext, input: StateInput) -> Transition {
        match input {
            StateInput::PeriodicTick => {
                ctx.emit_current_time();
                Transition::Stay
            }
            StateInput::Engine(EngineEvent::LoadedRangesChanged { ranges }) => {
                if let Some(duration) = forward_buffer(&ranges) {
                    ctx.emit(PlayerEvent::BufferDurationChanged { duration });
                }
                Transition::Stay
            }
            StateInput::Engine(EngineEvent::PlaybackStalled) => {
                debug!(target: targets::SERVICE, "Item playback stalled");
                self.redirect_to_buffering()
            }
            StateInput::Engine(EngineEvent::FailedToPlayToEnd) => {
                debug!(target: targets::SERVICE, "Item failed to play to end");
                self.redirect_to_buffering()
            }
            StateInput::Engine(EngineEvent::PlayedToEnd) => self.played_to_end(ctx),
            StateInput::Engine(EngineEvent::TimeControlStatusChanged { status }) => {
                debug!(target: targets::SERVICE, ?status, "Time control status changed");
                Transition::Stay
            }
            StateInput::Audio(AudioSessionEvent::InterruptionBegan) => {
                self.pause_by_interruption(ctx)
            }
            StateInput::Audio(AudioSessionEvent::RouteChanged { reason }) => {
                self.route_changed(reason)
            }
            _ => Transition::Stay,
        }
    }
}
