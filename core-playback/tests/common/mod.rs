//! Shared fakes for the playback integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::audio_session::{AudioSession, AudioSessionEvent, AudioSessionEventStream};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse, RetryPolicy};
use bridge_traits::media::{
    AccessLogEvent, EngineEvent, EngineEventStream, ItemStatus, MediaEngine, MediaItemId,
    MediaReference, SeekRequestId, TimeRange,
};
use core_playback::{PlayerConfig, PlayerEvent, PlayerStateKind, SessionManager};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU16, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};

// ============================================================================
// Media engine
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    ConfigureDefaults,
    CreateItem(String),
    ReplaceCurrentItem(Option<MediaItemId>),
    CancelLoading,
    Play,
    Pause,
    Seek(f64, SeekRequestId),
    CancelPendingSeeks,
}

struct EngineState {
    calls: Vec<EngineCall>,
    current_item: Option<MediaItemId>,
    status: ItemStatus,
    rate: Option<f64>,
    current_time: f64,
    duration: f64,
    seekable: Vec<TimeRange>,
    loaded: Vec<TimeRange>,
    access_log: Vec<AccessLogEvent>,
    pending_seeks: Vec<(SeekRequestId, f64)>,
}

/// Scriptable in-memory media engine. Nothing happens on its own: tests
/// drive readiness, rate and seek completion explicitly.
pub struct FakeEngine {
    state: Mutex<EngineState>,
    events_tx: mpsc::UnboundedSender<EngineEvent>,
    events_rx: Mutex<Option<mpsc::UnboundedReceiver<EngineEvent>>>,
}

impl FakeEngine {
    pub fn new() -> Arc<Self> {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            state: Mutex::new(EngineState {
                calls: Vec::new(),
                current_item: None,
                status: ItemStatus::Unknown,
                rate: None,
                current_time: 0.0,
                duration: f64::NAN,
                seekable: Vec::new(),
                loaded: Vec::new(),
                access_log: Vec::new(),
                pending_seeks: Vec::new(),
            }),
            events_tx,
            events_rx: Mutex::new(Some(events_rx)),
        })
    }

    pub fn emit(&self, event: EngineEvent) {
        self.events_tx.send(event).expect("session stopped listening");
    }

    /// Marks the current item ready with the given duration and reports it.
    pub fn make_ready(&self, duration: f64) {
        let item = {
            let mut state = self.state.lock();
            state.status = ItemStatus::ReadyToPlay;
            state.duration = duration;
            state.seekable = vec![TimeRange::new(0.0, duration)];
            state.current_item.expect("no current item")
        };
        self.emit(EngineEvent::ItemStatusChanged {
            item,
            status: ItemStatus::ReadyToPlay,
        });
    }

    pub fn fail_current_item(&self) {
        let item = {
            let mut state = self.state.lock();
            state.status = ItemStatus::Failed;
            state.current_item.expect("no current item")
        };
        self.emit(EngineEvent::ItemStatusChanged {
            item,
            status: ItemStatus::Failed,
        });
    }

    /// Completes the most recent seek and moves the position there.
    pub fn complete_last_seek(&self, finished: bool) -> SeekRequestId {
        let request = {
            let mut state = self.state.lock();
            let (request, position) = state.pending_seeks.pop().expect("no pending seek");
            if finished {
                state.current_time = position;
            }
            request
        };
        self.emit(EngineEvent::SeekCompleted { request, finished });
        request
    }

    pub fn complete_seek(&self, request: SeekRequestId, finished: bool) {
        self.state
            .lock()
            .pending_seeks
            .retain(|(pending, _)| *pending != request);
        self.emit(EngineEvent::SeekCompleted { request, finished });
    }

    pub fn set_rate(&self, rate: Option<f64>) {
        self.state.lock().rate = rate;
    }

    pub fn set_current_time(&self, time: f64) {
        self.state.lock().current_time = time;
    }

    pub fn set_access_log(&self, log: Vec<AccessLogEvent>) {
        self.state.lock().access_log = log;
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, predicate: impl Fn(&EngineCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn seeks(&self) -> Vec<(f64, SeekRequestId)> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::Seek(position, request) => Some((*position, *request)),
                _ => None,
            })
            .collect()
    }

    pub fn pending_seek_count(&self) -> usize {
        self.state.lock().pending_seeks.len()
    }

    pub fn current(&self) -> Option<MediaItemId> {
        self.state.lock().current_item
    }

    fn record(&self, call: EngineCall) {
        self.state.lock().calls.push(call);
    }
}

struct ChannelEvents {
    rx: mpsc::UnboundedReceiver<EngineEvent>,
}

#[async_trait]
impl EngineEventStream for ChannelEvents {
    async fn next(&mut self) -> Option<EngineEvent> {
        self.rx.recv().await
    }
}

impl MediaEngine for FakeEngine {
    fn configure_defaults(&self) {
        self.record(EngineCall::ConfigureDefaults);
    }

    fn create_item(&self, media: &MediaReference) -> MediaItemId {
        self.record(EngineCall::CreateItem(media.uri.clone()));
        MediaItemId::new()
    }

    fn replace_current_item(&self, item: Option<MediaItemId>) {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::ReplaceCurrentItem(item));
        state.current_item = item;
        state.status = ItemStatus::Unknown;
        state.rate = None;
        state.duration = f64::NAN;
        state.seekable.clear();
        state.loaded.clear();
    }

    fn current_item(&self) -> Option<MediaItemId> {
        self.state.lock().current_item
    }

    fn item_status(&self) -> ItemStatus {
        self.state.lock().status
    }

    fn cancel_loading(&self) {
        self.record(EngineCall::CancelLoading);
    }

    fn play(&self) {
        self.record(EngineCall::Play);
    }

    fn pause(&self) {
        self.record(EngineCall::Pause);
    }

    fn seek(&self, position: f64, request: SeekRequestId) {
        let mut state = self.state.lock();
        state.calls.push(EngineCall::Seek(position, request));
        state.pending_seeks.push((request, position));
    }

    fn cancel_pending_seeks(&self) {
        let cancelled: Vec<_> = {
            let mut state = self.state.lock();
            state.calls.push(EngineCall::CancelPendingSeeks);
            state.pending_seeks.drain(..).collect()
        };
        for (request, _) in cancelled {
            let _ = self.events_tx.send(EngineEvent::SeekCompleted {
                request,
                finished: false,
            });
        }
    }

    fn playback_rate(&self) -> Option<f64> {
        self.state.lock().rate
    }

    fn current_time(&self) -> f64 {
        self.state.lock().current_time
    }

    fn duration(&self) -> f64 {
        self.state.lock().duration
    }

    fn seekable_ranges(&self) -> Vec<TimeRange> {
        self.state.lock().seekable.clone()
    }

    fn loaded_ranges(&self) -> Vec<TimeRange> {
        self.state.lock().loaded.clone()
    }

    fn access_log(&self) -> Vec<AccessLogEvent> {
        self.state.lock().access_log.clone()
    }

    fn subscribe(&self) -> Box<dyn EngineEventStream> {
        let rx = self.events_rx.lock().take().unwrap_or_else(|| {
            let (_tx, rx) = mpsc::unbounded_channel();
            rx
        });
        Box::new(ChannelEvents { rx })
    }
}

// ============================================================================
// Audio session
// ============================================================================

pub struct FakeAudioSession {
    sender: broadcast::Sender<AudioSessionEvent>,
    silenced: Mutex<bool>,
}

impl FakeAudioSession {
    pub fn new() -> Arc<Self> {
        let (sender, _) = broadcast::channel(16);
        Arc::new(Self {
            sender,
            silenced: Mutex::new(false),
        })
    }

    pub fn publish(&self, event: AudioSessionEvent) {
        self.sender.send(event).expect("session stopped listening");
    }

    pub fn set_silenced(&self, silenced: bool) {
        *self.silenced.lock() = silenced;
    }
}

struct BroadcastEvents {
    rx: broadcast::Receiver<AudioSessionEvent>,
}

#[async_trait]
impl AudioSessionEventStream for BroadcastEvents {
    async fn next(&mut self) -> Option<AudioSessionEvent> {
        self.rx.recv().await.ok()
    }
}

impl AudioSession for FakeAudioSession {
    fn subscribe(&self) -> Box<dyn AudioSessionEventStream> {
        Box::new(BroadcastEvents {
            rx: self.sender.subscribe(),
        })
    }

    fn secondary_audio_should_be_silenced(&self) -> bool {
        *self.silenced.lock()
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Answers every request with a fixed status.
pub struct ScriptedHttp {
    status: AtomicU16,
    requests: AtomicUsize,
}

impl ScriptedHttp {
    pub fn new(status: u16) -> Arc<Self> {
        Arc::new(Self {
            status: AtomicU16::new(status),
            requests: AtomicUsize::new(0),
        })
    }

    pub fn set_status(&self, status: u16) {
        self.status.store(status, Ordering::SeqCst);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpClient for ScriptedHttp {
    async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(HttpResponse::with_status(self.status.load(Ordering::SeqCst)))
    }

    async fn execute_with_retry(
        &self,
        request: HttpRequest,
        _policy: RetryPolicy,
    ) -> BridgeResult<HttpResponse> {
        self.execute(request).await
    }
}

// ============================================================================
// Harness
// ============================================================================

pub const MEDIA_URI: &str = "https://cdn.example.com/show/episode.m3u8";

pub struct Harness {
    pub player: SessionManager,
    pub engine: Arc<FakeEngine>,
    pub audio: Arc<FakeAudioSession>,
    pub http: Arc<ScriptedHttp>,
    pub events: broadcast::Receiver<PlayerEvent>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(PlayerConfig::default())
    }

    pub fn with_config(config: PlayerConfig) -> Self {
        let engine = FakeEngine::new();
        let audio = FakeAudioSession::new();
        let http = ScriptedHttp::new(503);
        let player = SessionManager::builder()
            .engine(engine.clone())
            .audio_session(audio.clone())
            .http_client(http.clone())
            .config(config)
            .build()
            .expect("session should build");
        let events = player.subscribe();
        Self {
            player,
            engine,
            audio,
            http,
            events,
        }
    }

    pub fn media() -> MediaReference {
        MediaReference::new(MEDIA_URI)
    }

    /// Lets the session actor process everything queued so far.
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    /// Events published since the last drain.
    pub async fn drain(&mut self) -> Vec<PlayerEvent> {
        self.settle().await;
        let mut events = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            events.push(event);
        }
        events
    }

    /// Waits (on the virtual clock) until the session enters `kind`.
    /// Returns every event seen on the way, the state change included.
    pub async fn wait_for_state(&mut self, kind: PlayerStateKind) -> Vec<PlayerEvent> {
        let deadline = Duration::from_secs(120);
        let mut seen = Vec::new();
        loop {
            let event = tokio::time::timeout(deadline, self.events.recv())
                .await
                .unwrap_or_else(|_| panic!("never reached {kind}, saw {seen:?}"))
                .expect("event stream closed");
            let reached = event == PlayerEvent::StateChanged { state: kind };
            seen.push(event);
            if reached {
                return seen;
            }
        }
    }

    /// Loads the default media and drives it to Playing.
    pub async fn start_playing(&mut self, duration: f64) {
        self.player.load(Self::media(), true, None).unwrap();
        self.wait_for_state(PlayerStateKind::Loading).await;
        self.engine.make_ready(duration);
        self.wait_for_state(PlayerStateKind::Buffering).await;
        self.engine.set_rate(Some(1.0));
        self.wait_for_state(PlayerStateKind::Playing).await;
        self.drain().await;
    }
}

pub fn states(events: &[PlayerEvent]) -> Vec<PlayerStateKind> {
    events
        .iter()
        .filter_map(|event| match event {
            PlayerEvent::StateChanged { state } => Some(*state),
            _ => None,
        })
        .collect()
}

pub fn rejections(events: &[PlayerEvent]) -> Vec<core_playback::UnavailableActionReason> {
    events
        .iter()
        .filter_map(|event| match event {
            PlayerEvent::UnavailableAction { reason } => Some(*reason),
            _ => None,
        })
        .collect()
}
