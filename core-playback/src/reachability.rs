//! # Reachability Probe
//!
//! Polls a well-known endpoint while the session waits for the network. The
//! probe gives up after a fixed number of requests.
//!
//! - The first request goes out as soon as the probe starts, then one per tick.
//! - At most one request is in flight. A tick that finds a request still
//!   pending drops it before issuing the next one.
//! - A 2xx answer reports [`ReachabilityEvent::Reachable`]. Failures and
//!   request timeouts are silent; the next tick retries.
//! - A tick with no iterations left reports [`ReachabilityEvent::TimedOut`].

use crate::config::PlayerConfig;
use crate::logging::targets;
use bridge_traits::http::{HttpClient, HttpRequest, RetryPolicy};
use core_async::sync::CancellationToken;
use core_async::time::{ticker, timeout, Duration, FirstTick};
use futures::future::{BoxFuture, FutureExt, OptionFuture};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace};

/// Outcome reported by a [`ReachabilityProbe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReachabilityEvent {
    Reachable,
    TimedOut,
}

/// Probe parameters, usually taken from [`PlayerConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReachabilitySettings {
    pub url: String,
    pub request_timeout: Duration,
    pub tick: Duration,
    pub iterations: u32,
}

impl From<&PlayerConfig> for ReachabilitySettings {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            url: config.reachability_url.clone(),
            request_timeout: config.reachability_request_timeout,
            tick: config.reachability_tick,
            iterations: config.reachability_iterations,
        }
    }
}

type ReachabilityListener = Arc<dyn Fn(ReachabilityEvent) + Send + Sync>;

pub struct ReachabilityProbe {
    client: Arc<dyn HttpClient>,
    settings: ReachabilitySettings,
    listener: Arc<Mutex<Option<ReachabilityListener>>>,
    running: Option<CancellationToken>,
}

impl ReachabilityProbe {
    pub fn new(client: Arc<dyn HttpClient>, settings: ReachabilitySettings) -> Self {
        debug!(target: targets::SERVICE_LIFECYCLE, url = %settings.url, "Reachability probe created");
        Self {
            client,
            settings,
            listener: Arc::new(Mutex::new(None)),
            running: None,
        }
    }

    pub fn on_event<F>(&mut self, listener: F)
    where
        F: Fn(ReachabilityEvent) + Send + Sync + 'static,
    {
        *self.listener.lock() = Some(Arc::new(listener));
    }

    /// Starts probing with the full iteration budget.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) {
        self.stop();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let client = Arc::clone(&self.client);
        let settings = self.settings.clone();
        let listener = Arc::clone(&self.listener);

        debug!(
            target: targets::SERVICE,
            url = %settings.url,
            iterations = settings.iterations,
            "Reachability probe started"
        );
        core_async::spawn(async move {
            let mut ticks = ticker(settings.tick, FirstTick::Immediate);
            let mut remaining = settings.iterations;
            let mut in_flight: Option<BoxFuture<'static, bool>> = None;

            let outcome = loop {
                core_async::select! {
                    biased;

                    _ = cancelled.cancelled() => return,
                    _ = ticks.tick() => {
                        if remaining == 0 {
                            break ReachabilityEvent::TimedOut;
                        }
                        remaining -= 1;
                        trace!(target: targets::SERVICE, remaining, "Issuing reachability request");
                        in_flight = Some(probe_once(Arc::clone(&client), &settings));
                    }
                    Some(reachable) = OptionFuture::from(in_flight.as_mut()), if in_flight.is_some() => {
                        in_flight = None;
                        if reachable {
                            break ReachabilityEvent::Reachable;
                        }
                        debug!(target: targets::SERVICE, remaining, "Unreachable network");
                    }
                }
            };

            // Stopped or restarted while a request was completing.
            if cancelled.is_cancelled() {
                return;
            }
            debug!(target: targets::SERVICE, ?outcome, "Reachability probe finished");
            let current = listener.lock().clone();
            if let Some(notify) = current {
                notify(outcome);
            }
        });

        self.running = Some(token);
    }

    /// Cancels the timer and any pending request.
    pub fn stop(&mut self) {
        if let Some(token) = self.running.take() {
            token.cancel();
            debug!(target: targets::SERVICE, "Reachability probe stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .map_or(false, |token| !token.is_cancelled())
    }
}

impl Drop for ReachabilityProbe {
    fn drop(&mut self) {
        self.stop();
        debug!(target: targets::SERVICE_LIFECYCLE, "Reachability probe dropped");
    }
}

/// One bounded HEAD request. Resolves to `true` on a 2xx answer.
fn probe_once(client: Arc<dyn HttpClient>, settings: &ReachabilitySettings) -> BoxFuture<'static, bool> {
    let request = HttpRequest::head(settings.url.clone()).timeout(settings.request_timeout);
    let limit = settings.request_timeout;
    async move {
        match timeout(
            limit,
            client.execute_with_retry(request, RetryPolicy::single_attempt()),
        )
        .await
        {
            Ok(Ok(response)) => response.is_success(),
            Ok(Err(error)) => {
                trace!(target: targets::SERVICE, %error, "Reachability request failed");
                false
            }
            Err(_) => {
                trace!(target: targets::SERVICE, "Reachability request timed out");
                false
            }
        }
    }
    .boxed()
}
