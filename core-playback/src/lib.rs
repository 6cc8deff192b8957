//! # Playback Control Engine
//!
//! Turns imperative commands (load, play, pause, seek, stop) into one coherent
//! playback session over a host-supplied media engine.
//!
//! ## Overview
//!
//! - **SessionManager**: application-facing handle; commands in, events out
//! - **States**: Initializing, Loading, Buffering, Playing, Paused, Stopped,
//!   Failed and WaitingForNetwork, each deciding which commands are legal
//! - **Seek resolver**: bounds seek targets against duration or ranges
//! - **Stall observer**: samples the playback rate while buffering
//! - **Reachability probe**: polls an endpoint while waiting for the network
//! - **Performance accumulator**: per-item startup, stall and bitrate figures
//!
//! Illegal commands never fail; they publish
//! [`PlayerEvent::UnavailableAction`] and leave the state untouched.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod observing;
pub mod performance;
pub mod reachability;
pub mod seek;
pub mod stall;
pub mod types;

mod context;
mod manager;
mod session;
mod state;

pub use config::PlayerConfig;
pub use error::{PlaybackError, PlayerError, Result};
pub use events::{PerformanceReport, PlayerEvent};
pub use manager::{SessionManager, SessionManagerBuilder};
pub use types::{LoadRequest, PlayerStateKind, UnavailableActionReason};
