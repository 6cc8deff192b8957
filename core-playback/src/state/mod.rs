//! # Playback States
//!
//! One struct per state, all behind the [`PlayerState`] trait. A state never
//! installs its successor itself: every handler returns a [`Transition`] and
//! the session applies it after the handler has returned.
//!
//! ```text
//! Initializing ──load──> Loading ──ready──> Buffering ──rate>0──> Playing
//!                           │                  │  ▲                  │
//!                         failed            timeout└──stalled/end────┘
//!                           ▼                  ▼
//!                         Failed <──gave up── WaitingForNetwork
//! ```

mod buffering;
mod failed;
mod initializing;
mod loading;
mod paused;
mod playing;
mod waiting_network;

pub(crate) use buffering::BufferingState;
pub(crate) use failed::FailedState;
pub(crate) use initializing::InitializingState;
pub(crate) use loading::LoadingState;
pub(crate) use paused::PausedState;
pub(crate) use playing::PlayingState;
pub(crate) use waiting_network::WaitingForNetworkState;

use crate::context::PlayerContext;
use crate::reachability::ReachabilityEvent;
use crate::stall::StallEvent;
use crate::types::{LoadRequest, PlayerStateKind};
use bridge_traits::audio_session::AudioSessionEvent;
use bridge_traits::media::EngineEvent;

/// Asynchronous input delivered to the live state.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StateInput {
    Engine(EngineEvent),
    Audio(AudioSessionEvent),
    Stall(StallEvent),
    Reachability(ReachabilityEvent),
    PeriodicTick,
}

/// Work to run on the new state right after it is installed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum FollowUp {
    Play,
    Seek(f64),
}

/// What the session should do after a state handler returns.
pub(crate) enum Transition {
    Stay,
    Switch {
        next: Box<dyn PlayerState>,
        then: Option<FollowUp>,
    },
}

impl Transition {
    pub fn to<S: PlayerState + 'static>(next: S) -> Self {
        Transition::Switch {
            next: Box::new(next),
            then: None,
        }
    }

    pub fn to_then_play<S: PlayerState + 'static>(next: S) -> Self {
        Transition::Switch {
            next: Box::new(next),
            then: Some(FollowUp::Play),
        }
    }

    pub fn to_then_seek<S: PlayerState + 'static>(next: S, position: f64) -> Self {
        Transition::Switch {
            next: Box::new(next),
            then: Some(FollowUp::Seek(position)),
        }
    }
}

/// Behaviour of one playback state.
///
/// `seek` receives a position already bounded by the seek resolver.
pub(crate) trait PlayerState: Send {
    fn kind(&self) -> PlayerStateKind;

    /// Entry action, run once after the state is installed.
    fn enter(&mut self, _ctx: &mut PlayerContext) {}

    /// Teardown, run before the successor is installed.
    fn exit(&mut self, _ctx: &mut PlayerContext) {}

    fn load(&mut self, _ctx: &mut PlayerContext, request: LoadRequest) -> Transition {
        Transition::to(LoadingState::new(request))
    }

    fn play(&mut self, ctx: &mut PlayerContext) -> Transition;

    fn pause(&mut self, ctx: &mut PlayerContext) -> Transition;

    fn stop(&mut self, ctx: &mut PlayerContext) -> Transition;

    fn seek(&mut self, ctx: &mut PlayerContext, position: f64) -> Transition;

    fn on_input(&mut self, _ctx: &mut PlayerContext, _input: StateInput) -> Transition {
        Transition::Stay
    }
}
