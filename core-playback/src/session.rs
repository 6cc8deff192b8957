//! # Session Actor
//!
//! A single task owns the live state and the [`PlayerContext`]. Commands from
//! the facade, observer signals, engine events and audio-session events are
//! all funnelled into it, so state reads and writes never interleave.
//!
//! ```text
//! SessionManager ──Command──┐
//! observers ──Signal(gen)───┤ mailbox ──┐
//!                           │           ├──> Session::run ──> live state
//! MediaEngine ──EngineEvent─────────────┤
//! AudioSession ──AudioEvent─────────────┘
//! ```
//!
//! ## Transitions
//!
//! Handlers return a [`Transition`]; the session applies it after the handler
//! returned. Applying one:
//!
//! 1. runs `exit` on the outgoing state,
//! 2. cancels the outgoing scope and bumps the generation, which invalidates
//!    every pending observer signal,
//! 3. installs the new state, logs and publishes the change once,
//! 4. runs `enter`, then the optional follow-up command.

use crate::context::PlayerContext;
use crate::events::PlayerEvent;
use crate::logging::targets;
use crate::seek::{self, SeekQuery};
use crate::state::{FollowUp, InitializingState, PlayerState, StateInput, Transition};
use crate::types::{LoadRequest, PlayerStateKind, UnavailableActionReason};
use bridge_traits::audio_session::AudioSessionEventStream;
use bridge_traits::media::{EngineEvent, EngineEventStream};
use core_async::sync::{mpsc, watch};
use core_runtime::logging::redact_uri;
use tracing::{debug, info, trace, warn};

/// Commands accepted by the session.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PlayerCommand {
    Load(LoadRequest),
    Play,
    Pause,
    Stop,
    Seek(f64),
    SeekBy(f64),
    SetLoopMode(bool),
}

impl PlayerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            PlayerCommand::Load(_) => "load",
            PlayerCommand::Play => "play",
            PlayerCommand::Pause => "pause",
            PlayerCommand::Stop => "stop",
            PlayerCommand::Seek(_) => "seek",
            PlayerCommand::SeekBy(_) => "seek_by",
            PlayerCommand::SetLoopMode(_) => "set_loop_mode",
        }
    }
}

pub(crate) enum SessionMessage {
    Command(PlayerCommand),
    /// Result of an observer started by the state of `generation`.
    Signal {
        generation: u64,
        input: StateInput,
    },
    Shutdown,
}

pub(crate) struct Session {
    state: Box<dyn PlayerState>,
    ctx: PlayerContext,
    state_tx: watch::Sender<PlayerStateKind>,
}

impl Session {
    /// Creates the session in the Initializing state and runs its entry
    /// action. No state change is published for the initial state.
    pub fn new(ctx: PlayerContext, state_tx: watch::Sender<PlayerStateKind>) -> Self {
        let mut session = Self {
            state: Box::new(InitializingState),
            ctx,
            state_tx,
        };
        info!(
            target: targets::STATE_LIFECYCLE,
            session = %session.ctx.session_id,
            "Session created"
        );
        session.state.enter(&mut session.ctx);
        session
    }

    pub async fn run(
        mut self,
        mut mailbox: mpsc::UnboundedReceiver<SessionMessage>,
        mut engine_events: Box<dyn EngineEventStream>,
        mut audio_events: Box<dyn AudioSessionEventStream>,
    ) {
        let mut engine_open = true;
        let mut audio_open = true;

        loop {
            core_async::select! {
                biased;

                message = mailbox.recv() => match message {
                    Some(SessionMessage::Command(command)) => self.handle_command(command),
                    Some(SessionMessage::Signal { generation, input }) => {
                        self.handle_signal(generation, input)
                    }
                    Some(SessionMessage::Shutdown) | None => break,
                },
                event = engine_events.next(), if engine_open => match event {
                    Some(event) => self.handle_engine_event(event),
                    None => {
                        warn!(target: targets::SERVICE, "Engine event stream closed");
                        engine_open = false;
                    }
                },
                event = audio_events.next(), if audio_open => match event {
                    Some(event) => self.dispatch(StateInput::Audio(event)),
                    None => {
                        debug!(target: targets::SERVICE, "Audio session event stream closed");
                        audio_open = false;
                    }
                },
            }
        }

        self.teardown();
    }

    pub fn handle_command(&mut self, command: PlayerCommand) {
        debug!(
            target: targets::COMMAND,
            command = command.name(),
            state = %self.state.kind(),
            "Command received"
        );
        let transition = match command {
            PlayerCommand::Load(request) => {
                info!(
                    target: targets::COMMAND,
                    uri = %redact_uri(&request.media.uri),
                    autostart = request.autostart,
                    "Load"
                );
                self.ctx.media = Some(request.media.clone());
                self.ctx.emit(PlayerEvent::CurrentMediaChanged {
                    media: Some(request.media.clone()),
                });
                self.state.load(&mut self.ctx, request)
            }
            PlayerCommand::Play => self.state.play(&mut self.ctx),
            PlayerCommand::Pause => self.state.pause(&mut self.ctx),
            PlayerCommand::Stop => self.state.stop(&mut self.ctx),
            PlayerCommand::Seek(position) => self.seek(position),
            PlayerCommand::SeekBy(offset) => {
                let position = self.ctx.engine.current_time() + offset;
                self.seek(position)
            }
            PlayerCommand::SetLoopMode(enabled) => {
                self.ctx.loop_mode = enabled;
                Transition::Stay
            }
        };
        self.apply(transition);
    }

    /// Bounds the target before the state sees it.
    fn seek(&mut self, requested: f64) -> Transition {
        if self.ctx.engine.current_item().is_none() {
            self.ctx.reject(UnavailableActionReason::LoadMediaFirst);
            return Transition::Stay;
        }

        let engine = &self.ctx.engine;
        let query = SeekQuery {
            requested,
            duration: engine.duration(),
            seekable: engine.seekable_ranges(),
            loaded: engine.loaded_ranges(),
        };
        match seek::resolve(&query) {
            Ok(position) => self.state.seek(&mut self.ctx, position),
            Err(reason) => {
                self.ctx.reject(reason);
                Transition::Stay
            }
        }
    }

    fn handle_signal(&mut self, generation: u64, input: StateInput) {
        if generation != self.ctx.generation() {
            trace!(
                target: targets::STATE,
                generation,
                current = self.ctx.generation(),
                ?input,
                "Dropping signal for a replaced state"
            );
            return;
        }
        self.dispatch(input);
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        if let Some(performance) = self.ctx.performance.as_mut() {
            match &event {
                EngineEvent::RateChanged { rate } => performance.rate_changed(*rate),
                EngineEvent::PlaybackStalled => performance.playback_stalled(),
                _ => {}
            }
        }
        self.dispatch(StateInput::Engine(event));
    }

    fn dispatch(&mut self, input: StateInput) {
        let transition = self.state.on_input(&mut self.ctx, input);
        self.apply(transition);
    }

    fn apply(&mut self, mut transition: Transition) {
        while let Transition::Switch { next, then } = transition {
            self.switch_to(next);
            transition = match then {
                Some(FollowUp::Play) => self.state.play(&mut self.ctx),
                Some(FollowUp::Seek(position)) => self.state.seek(&mut self.ctx, position),
                None => Transition::Stay,
            };
        }
    }

    fn switch_to(&mut self, next: Box<dyn PlayerState>) {
        let from = self.state.kind();
        let to = next.kind();

        self.state.exit(&mut self.ctx);
        self.ctx.begin_scope();
        self.state = next;

        info!(
            target: targets::STATE,
            session = %self.ctx.session_id,
            %from,
            %to,
            "State changed"
        );
        self.ctx.emit(PlayerEvent::StateChanged { state: to });
        self.state_tx.send_replace(to);

        self.state.enter(&mut self.ctx);
    }

    fn teardown(&mut self) {
        self.state.exit(&mut self.ctx);
        self.ctx.end_scope();
        info!(
            target: targets::STATE_LIFECYCLE,
            session = %self.ctx.session_id,
            state = %self.state.kind(),
            "Session closed"
        );
    }
}
