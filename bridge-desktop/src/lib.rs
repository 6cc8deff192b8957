//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux):
//! - `HttpClient` using `reqwest`, used by the reachability probe
//! - `AudioSession` fed by the host shell
//!
//! The media engine itself is always host-specific and is not provided here.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DesktopAudioSession, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let audio_session = Arc::new(DesktopAudioSession::new());
//! ```

mod audio_session;
mod http;

pub use audio_session::DesktopAudioSession;
pub use http::ReqwestHttpClient;
