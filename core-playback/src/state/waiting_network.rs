//! WaitingForNetwork: buffering gave up, the session probes connectivity
//! before retrying or failing for good.

use super::{BufferingState, FailedState, PausedState, PlayerState, StateInput, Transition};
use crate::context::PlayerContext;
use crate::error::PlayerError;
use crate::logging::targets;
use crate::reachability::{ReachabilityEvent, ReachabilityProbe, ReachabilitySettings};
use crate::types::{PlayerStateKind, UnavailableActionReason};
use tracing::info;

pub(crate) struct WaitingForNetworkState {
    error: PlayerError,
    probe: Option<ReachabilityProbe>,
}

impl WaitingForNetworkState {
    /// `error` is what the session fails with if the network never returns.
    pub fn new(error: PlayerError) -> Self {
        Self { error, probe: None }
    }
}

impl PlayerState for WaitingForNetworkState {
    fn kind(&self) -> PlayerStateKind {
        PlayerStateKind::WaitingForNetwork
    }

    fn enter(&mut self, ctx: &mut PlayerContext) {
        ctx.mark_current_item_failed();

        let settings = ReachabilitySettings::from(ctx.config.as_ref());
        let mut probe = ReachabilityProbe::new(ctx.http_client.clone(), settings);
        let notifier = ctx.notifier();
        probe.on_event(move |event| notifier.notify(StateInput::Reachability(event)));
        probe.start();
        self.probe = Some(probe);
    }

    fn exit(&mut self, _ctx: &mut PlayerContext) {
        if let Some(probe) = self.probe.as_mut() {
            probe.stop();
        }
    }

    fn play(&mut self, ctx: &mut PlayerContext) -> Transition {
        ctx.reject(UnavailableActionReason::WaitEstablishedNetwork);
        Transition::Stay
    }

    fn pause(&mut self, _ctx: &mut PlayerContext) -> Transition {
        Transition::to(PausedState::paused())
    }

    fn stop(&mut self, _ctx: &mut PlayerContext) -> Transition {
        Transition::to(PausedState::stopped())
    }

    fn seek(&mut self, ctx: &mut PlayerContext, _position: f64) -> Transition {
        ctx.reject(UnavailableActionReason::WaitEstablishedNetwork);
        Transition::Stay
    }

    fn on_input(&mut self, _ctx: &mut PlayerContext, input: StateInput) -> Transition {
        match input {
            StateInput::Reachability(ReachabilityEvent::Reachable) => {
                info!(target: targets::SERVICE, "Network reachable again");
                Transition::to_then_play(BufferingState::new())
            }
            StateInput::Reachability(ReachabilityEvent::TimedOut) => {
                Transition::to(FailedState::new(self.error))
            }
            _ => Transition::Stay,
        }
    }
}
