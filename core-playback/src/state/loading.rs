//! Loading: an engine item is being prepared for the current media.

use super::{BufferingState, FailedState, PausedState, PlayerState, StateInput, Transition};
use crate::context::PlayerContext;
use crate::error::PlayerError;
use crate::logging::targets;
use crate::performance::PerformanceAccumulator;
use crate::types::{LoadRequest, PlayerStateKind, UnavailableActionReason};
use bridge_traits::audio_session::AudioSessionEvent;
use bridge_traits::media::{EngineEvent, ItemStatus, MediaItemId, SeekRequestId};
use core_runtime::logging::redact_uri;
use tracing::{debug, trace};

pub(crate) struct LoadingState {
    request: LoadRequest,
    item: Option<MediaItemId>,
    pending_seek: Option<SeekRequestId>,
    use_prepared: bool,
}

impl LoadingState {
    /// Loading for a `load` command. The caller-prepared item, if any, is
    /// installed unless it already failed in this session.
    pub fn new(request: LoadRequest) -> Self {
        Self {
            request,
            item: None,
            pending_seek: None,
            use_prepared: true,
        }
    }

    /// Loading the current media again after a pause, stop or failure.
    /// Always installs a brand-new engine item.
    pub fn reload(request: LoadRequest) -> Self {
        Self {
            use_prepared: false,
            ..Self::new(request)
        }
    }

    fn process(&mut self, ctx: &mut PlayerContext) {
        let media = &self.request.media;
        let prepared = media
            .prepared_item
            .filter(|prepared| self.use_prepared && !ctx.is_failed(prepared));
        let item = match prepared {
            Some(prepared) => prepared,
            None => ctx.engine.create_item(media),
        };
        debug!(
            target: targets::STATE,
            uri = %redact_uri(&media.uri),
            %item,
            autostart = self.request.autostart,
            failed_items = ctx.failed_item_count(),
            "Loading media"
        );

        ctx.performance = Some(PerformanceAccumulator::new());
        self.item = Some(item);
        self.pending_seek = None;
        ctx.engine.replace_current_item(Some(item));

        if self.request.position.is_none() {
            ctx.emit_current_time();
        }
    }

    fn cancel_loading(&self, ctx: &PlayerContext) {
        ctx.engine.cancel_loading();
        ctx.engine.cancel_pending_seeks();
    }

    fn move_to_buffering(&self) -> Transition {
        if self.request.autostart {
            Transition::to_then_play(BufferingState::new())
        } else {
            Transition::to(BufferingState::new())
        }
    }

    fn item_status_changed(&mut self, ctx: &mut PlayerContext, status: ItemStatus) -> Transition {
        match status {
            ItemStatus::Unknown => {
                trace!(target: targets::STATE, "Item status still unknown");
                Transition::Stay
            }
            ItemStatus::Failed => Transition::to(FailedState::new(PlayerError::LoadingFailed)),
            ItemStatus::ReadyToPlay => match self.request.position {
                Some(position) => {
                    let request = ctx.next_seek_request();
                    self.pending_seek = Some(request);
                    ctx.engine.seek(position, request);
                    Transition::Stay
                }
                None => self.move_to_buffering(),
            },
        }
    }
}

impl PlayerState for LoadingState {
    fn kind(&self) -> PlayerStateKind {
        PlayerStateKind::Loading
    }

    fn enter(&mut self, ctx: &mut PlayerContext) {
        self.process(ctx);
    }

    fn load(&mut self, ctx: &mut PlayerContext, request: LoadRequest) -> Transition {
        self.request = request;
        self.use_prepared = true;
        self.process(ctx);
        Transition::Stay
    }

    fn play(&mut self, ctx: &mut PlayerContext) -> Transition {
        ctx.reject(UnavailableActionReason::WaitLoadedMedia);
        Transition::Stay
    }

    fn pause(&mut self, ctx: &mut PlayerContext) -> Transition {
        self.cancel_loading(ctx);
        Transition::to(PausedState::paused())
    }

    fn stop(&mut self, ctx: &mut PlayerContext) -> Transition {
        self.cancel_loading(ctx);
        ctx.engine.replace_current_item(None);
        Transition::to(PausedState::stopped())
    }

    fn seek(&mut self, ctx: &mut PlayerContext, _position: f64) -> Transition {
        ctx.reject(UnavailableActionReason::WaitLoadedMedia);
        Transition::Stay
    }

    fn on_input(&mut self, ctx: &mut PlayerContext, input: StateInput) -> Transition {
        match input {
            StateInput::Engine(EngineEvent::ItemStatusChanged { item, status })
                if Some(item) == self.item =>
            {
                self.item_status_changed(ctx, status)
            }
            StateInput::Engine(EngineEvent::SeekCompleted { request, finished })
                if Some(request) == self.pending_seek =>
            {
                self.pending_seek = None;
                ctx.emit_current_time();
                if finished {
                    self.move_to_buffering()
                } else {
                    Transition::Stay
                }
            }
            StateInput::Audio(AudioSessionEvent::InterruptionBegan) => self.pause(ctx),
            _ => Transition::Stay,
        }
    }
}
