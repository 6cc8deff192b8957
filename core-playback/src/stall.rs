//! # Stall Observer
//!
//! Samples the engine's playback rate on a fixed tick and decides whether
//! buffering turned into playback or gave up.
//!
//! ```text
//! start ──tick──tick──tick──...──tick
//!          │     │     │          │
//!          rate != 0 ──> Playing  remaining == 0 ──> Timeout
//! ```
//!
//! Both outcomes are one-shot: the sampling task ends after reporting. Ticks
//! taken while the item has no timebase (rate `None`) do not count against
//! the timeout.

use crate::logging::targets;
use core_async::sync::CancellationToken;
use core_async::time::{ticker, Duration, FirstTick};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace};

/// Outcome reported by a [`StallObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StallEvent {
    /// The playback rate became non-zero.
    Playing,
    /// The timeout elapsed with a zero rate.
    Timeout,
}

type RateSource = Arc<dyn Fn() -> Option<f64> + Send + Sync>;
type StallListener = Arc<dyn Fn(StallEvent) + Send + Sync>;

pub struct StallObserver {
    rate: RateSource,
    timeout: Duration,
    tick: Duration,
    listener: Arc<Mutex<Option<StallListener>>>,
    running: Option<CancellationToken>,
}

impl StallObserver {
    /// Creates an idle observer. `rate` is sampled once per tick.
    pub fn new<R>(timeout: Duration, tick: Duration, rate: R) -> Self
    where
        R: Fn() -> Option<f64> + Send + Sync + 'static,
    {
        debug!(target: targets::SERVICE_LIFECYCLE, ?timeout, ?tick, "Stall observer created");
        Self {
            rate: Arc::new(rate),
            timeout,
            tick,
            listener: Arc::new(Mutex::new(None)),
            running: None,
        }
    }

    /// Registers the listener that receives the outcome, replacing any
    /// previous one.
    pub fn on_event<F>(&mut self, listener: F)
    where
        F: Fn(StallEvent) + Send + Sync + 'static,
    {
        *self.listener.lock() = Some(Arc::new(listener));
    }

    /// Starts (or restarts) sampling with the full timeout.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) {
        self.cancel();

        let token = CancellationToken::new();
        let rate = Arc::clone(&self.rate);
        let listener = Arc::clone(&self.listener);
        let timeout = self.timeout;
        let tick = self.tick;
        let cancelled = token.clone();

        debug!(target: targets::SERVICE, ?timeout, "Stall observer started");
        core_async::spawn(async move {
            let mut ticks = ticker(tick, FirstTick::AfterPeriod);
            let mut remaining = timeout;
            loop {
                core_async::select! {
                    biased;

                    _ = cancelled.cancelled() => return,
                    _ = ticks.tick() => {}
                }

                let Some(rate) = rate() else {
                    trace!(target: targets::SERVICE, "No timebase yet, skipping tick");
                    continue;
                };
                remaining = remaining.saturating_sub(tick);

                let outcome = if rate != 0.0 {
                    StallEvent::Playing
                } else if remaining.is_zero() {
                    StallEvent::Timeout
                } else {
                    trace!(target: targets::SERVICE, ?remaining, "Remaining time");
                    continue;
                };

                // Stopped or restarted while sampling.
                if cancelled.is_cancelled() {
                    return;
                }
                debug!(target: targets::SERVICE, ?outcome, rate, "Stall observer finished");
                let current = listener.lock().clone();
                if let Some(notify) = current {
                    notify(outcome);
                }
                return;
            }
        });

        self.running = Some(token);
    }

    /// Cancels sampling. With `clear_callbacks` the listener is dropped too,
    /// so nothing can be reported even if the observer is started again.
    pub fn stop(&mut self, clear_callbacks: bool) {
        if clear_callbacks {
            self.listener.lock().take();
        }
        if self.cancel() {
            debug!(target: targets::SERVICE, clear_callbacks, "Stall observer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .map_or(false, |token| !token.is_cancelled())
    }

    fn cancel(&mut self) -> bool {
        match self.running.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

impl Drop for StallObserver {
    fn drop(&mut self) {
        self.cancel();
        debug!(target: targets::SERVICE_LIFECYCLE, "Stall observer dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_async::sync::mpsc;

    fn observer(rate: Arc<Mutex<Option<f64>>>) -> (StallObserver, mpsc::UnboundedReceiver<StallEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut observer = StallObserver::new(
            Duration::from_secs(3),
            Duration::from_millis(300),
            move || *rate.lock(),
        );
        observer.on_event(move |event| {
            let _ = tx.send(event);
        });
        (observer, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_rate_times_out_once() {
        let rate = Arc::new(Mutex::new(Some(0.0)));
        let (mut observer, mut rx) = observer(rate);
        let started = tokio::time::Instant::now();
        observer.start();

        assert_eq!(rx.recv().await, Some(StallEvent::Timeout));
        assert!(started.elapsed() >= Duration::from_secs(3));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nonzero_rate_reports_playing_at_that_tick() {
        let rate = Arc::new(Mutex::new(Some(0.0)));
        let (mut observer, mut rx) = observer(Arc::clone(&rate));
        observer.start();

        tokio::time::sleep(Duration::from_millis(1000)).await;
        *rate.lock() = Some(1.0);

        assert_eq!(rx.recv().await, Some(StallEvent::Playing));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_timebase_does_not_consume_timeout() {
        let rate = Arc::new(Mutex::new(None));
        let (mut observer, mut rx) = observer(Arc::clone(&rate));
        let started = tokio::time::Instant::now();
        observer.start();

        tokio::time::sleep(Duration::from_secs(2)).await;
        *rate.lock() = Some(0.0);

        // Ticks at 0.3..=1.8s are skipped, the ten counted ones run 2.1..=4.8s.
        assert_eq!(rx.recv().await, Some(StallEvent::Timeout));
        assert!(started.elapsed() >= Duration::from_millis(4800));
        assert!(started.elapsed() < Duration::from_millis(5100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_with_clear_silences_observer() {
        let rate = Arc::new(Mutex::new(Some(0.0)));
        let (mut observer, mut rx) = observer(rate);
        observer.start();
        assert!(observer.is_running());

        tokio::time::sleep(Duration::from_secs(1)).await;
        observer.stop(true);
        assert!(!observer.is_running());

        observer.start();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_rearms_full_timeout() {
        let rate = Arc::new(Mutex::new(Some(0.0)));
        let (mut observer, mut rx) = observer(rate);
        let mut started = tokio::time::Instant::now();
        observer.start();

        tokio::time::sleep(Duration::from_secs(2)).await;
        observer.start();
        started += Duration::from_secs(2);

        assert_eq!(rx.recv().await, Some(StallEvent::Timeout));
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_final_sample_suppresses_outcome() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let slot: Arc<Mutex<Option<StallObserver>>> = Arc::new(Mutex::new(None));
        let sampler = Arc::clone(&slot);
        let mut observer = StallObserver::new(
            Duration::from_millis(300),
            Duration::from_millis(300),
            move || {
                if let Some(observer) = sampler.lock().as_mut() {
                    observer.stop(false);
                }
                Some(0.0)
            },
        );
        observer.on_event(move |event| {
            let _ = tx.send(event);
        });
        observer.start();
        *slot.lock() = Some(observer);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
        assert!(slot.lock().as_ref().is_some_and(|observer| !observer.is_running()));
    }
}
