//! Desktop audio session.
//!
//! Desktop platforms have no system-wide audio interruptions, so the session
//! never produces them on its own. Host shells that do observe device changes
//! (a USB DAC unplugged, a Bluetooth headset dropping) forward them with
//! [`DesktopAudioSession::publish`].

use async_trait::async_trait;
use bridge_traits::audio_session::{AudioSession, AudioSessionEvent, AudioSessionEventStream};
use core_async::sync::broadcast;
use parking_lot::RwLock;
use tracing::{debug, warn};

const EVENT_CAPACITY: usize = 16;

/// Audio session fed by the desktop host shell.
pub struct DesktopAudioSession {
    sender: broadcast::Sender<AudioSessionEvent>,
    exclusive_audio: RwLock<bool>,
}

impl DesktopAudioSession {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            sender,
            exclusive_audio: RwLock::new(false),
        }
    }

    /// Forward a host notification to every subscriber.
    pub fn publish(&self, event: AudioSessionEvent) {
        debug!(?event, "Publishing audio session event");
        if self.sender.send(event).is_err() {
            debug!("No audio session subscribers");
        }
    }

    /// Record whether another application currently holds exclusive audio.
    pub fn set_exclusive_audio(&self, exclusive: bool) {
        *self.exclusive_audio.write() = exclusive;
    }
}

impl Default for DesktopAudioSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSession for DesktopAudioSession {
    fn subscribe(&self) -> Box<dyn AudioSessionEventStream> {
        Box::new(BroadcastAudioEvents {
            receiver: self.sender.subscribe(),
        })
    }

    fn secondary_audio_should_be_silenced(&self) -> bool {
        *self.exclusive_audio.read()
    }
}

struct BroadcastAudioEvents {
    receiver: broadcast::Receiver<AudioSessionEvent>,
}

#[async_trait]
impl AudioSessionEventStream for BroadcastAudioEvents {
    async fn next(&mut self) -> Option<AudioSessionEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Audio session subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
