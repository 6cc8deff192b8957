//! # Host Bridge Traits
//!
//! Contracts for everything the playback core consumes but does not own.
//!
//! ## Overview
//!
//! The playback core coordinates a media engine, the host audio session and a
//! network probe. Each of those is supplied by the host platform through one
//! of the traits below, so the core stays free of platform APIs and can be
//! driven by fakes in tests.
//!
//! ## Traits
//!
//! ### Playback
//! - [`MediaEngine`](media::MediaEngine) - Opaque player: items, seek, rate, ranges
//! - [`AudioSession`](audio_session::AudioSession) - Interruptions and route changes
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP used for connectivity probing
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Fail-Fast Strategy
//!
//! The core fails at construction with a descriptive error when a required
//! capability was not injected:
//!
//! ```ignore
//! let engine = builder.engine.ok_or_else(|| PlaybackError::CapabilityMissing {
//!     capability: "MediaEngine".to_string(),
//!     message: "A host media engine must be injected".to_string(),
//! })?;
//! ```
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! between the control task and timer tasks.

pub mod audio_session;
pub mod error;
pub mod http;
pub mod logging;
pub mod media;

pub use error::BridgeError;

pub use audio_session::{AudioSession, AudioSessionEvent, AudioSessionEventStream, RouteChangeReason};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use media::{
    AccessLogEvent, EngineEvent, EngineEventStream, ItemStatus, MediaEngine, MediaItemId,
    MediaReference, SeekRequestId, TimeControlStatus, TimeRange,
};
