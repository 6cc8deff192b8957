//! Workspace facade crate.
//!
//! Re-exports the playback engine together with the bridge contracts a host
//! has to implement, so applications can depend on `playctl-workspace` alone
//! and toggle the documented features.

pub use bridge_traits as bridge;
pub use core_playback as playback;
pub use core_runtime as runtime;

pub use core_playback::{
    LoadRequest, PlaybackError, PlayerConfig, PlayerEvent, PlayerStateKind, SessionManager,
    SessionManagerBuilder, UnavailableActionReason,
};
