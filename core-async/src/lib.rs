//! Async runtime facade for the playback control engine.
//!
//! Every crate in the workspace reaches the executor through this crate instead
//! of naming `tokio` directly, so timer and channel choices live in one place.
//!
//! # Modules
//!
//! - `task`: task spawning
//! - `time`: sleeps, timeouts and recurring tickers
//! - `sync`: channels, locks and cancellation tokens
//! - `runtime`: runtime handles and a blocking entry point for synchronous callers
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{ticker, Duration, FirstTick};
//!
//! async fn example() {
//!     let mut ticks = ticker(Duration::from_millis(300), FirstTick::AfterPeriod);
//!     ticks.tick().await;
//! }
//! ```

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;

/// Waits on several branches and runs the first one to complete.
pub use tokio::select;
pub use time::{sleep, Duration, Instant};
