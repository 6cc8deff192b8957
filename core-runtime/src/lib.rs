//! # Core Runtime Module
//!
//! Ambient runtime infrastructure shared by the playback crates:
//! - Logging and tracing bootstrap
//! - Typed broadcast event bus
//! - Runtime error type
//!
//! ## Overview
//!
//! Nothing in here knows about playback. The playback core defines its own
//! event enum and publishes it through [`events::EventBus`]; hosts call
//! [`logging::init_logging`] once at startup.

pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
