//! Runtime utilities for synchronous callers.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Runs the provided future to completion on a throwaway current-thread runtime.
///
/// Used by callers that may run outside any runtime, such as a tracing layer
/// forwarding to an async sink. Returns an error when the runtime cannot be
/// built.
pub fn block_on<F>(future: F) -> std::io::Result<F::Output>
where
    F: std::future::Future,
{
    let runtime = Builder::new_current_thread().enable_all().build()?;
    Ok(runtime.block_on(future))
}
