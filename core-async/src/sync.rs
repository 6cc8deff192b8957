//! Synchronization primitives.
//!
//! Channels carry messages into the session actor, `broadcast` fans events out
//! to the application, and [`CancellationToken`] tears down timers and probes
//! owned by a superseded playback state.

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};

pub use tokio_util::sync::{CancellationToken, DropGuard, WaitForCancellationFuture};
