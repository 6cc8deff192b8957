use super::{PausedState, PlayerState, Transition};
use crate::context::PlayerContext;
use crate::logging::targets;
use crate::types::{PlayerStateKind, UnavailableActionReason};
use tracing::debug;

/// State of a session that has never loaded anything.
pub(crate) struct InitializingState;

impl PlayerState for InitializingState {
    fn kind(&self) -> PlayerStateKind {
        PlayerStateKind::Initializing
    }

    fn enter(&mut self, ctx: &mut PlayerContext) {
        debug!(target: targets::STATE_LIFECYCLE, "Configuring engine defaults");
        ctx.engine.configure_defaults();
    }

    fn play(&mut self, ctx: &mut PlayerContext) -> Transition {
        ctx.reject(UnavailableActionReason::LoadMediaFirst);
        Transition::Stay
    }

    fn pause(&mut self, _ctx: &mut PlayerContext) -> Transition {
        Transition::to(PausedState::paused())
    }

    fn stop(&mut self, _ctx: &mut PlayerContext) -> Transition {
        Transition::to(PausedState::stopped())
    }

    fn seek(&mut self, ctx: &mut PlayerContext, _position: f64) -> Transition {
        ctx.reject(UnavailableActionReason::LoadMediaFirst);
        Transition::Stay
    }
}
