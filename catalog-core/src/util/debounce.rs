//!  src/util/debounce.rs
//!  ===================================================================
//!  Cancel-and-restart debouncing for a single logical input.
//!
//!  • Each submit aborts the pending sleeper and starts a fresh one, so at
//!    most one delayed continuation exists at any time.
//!  • Uses `tokio::time::sleep_until`; aborted sleepers are dropped, never
//!    leaked.
//!  • Every submission carries a generation number. A sleeper that fired in
//!    the instant before its abort can still deliver, so receivers must
//!    check the generation with [`Debouncer::acknowledge`].

use std::time::Duration;
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::{debug, trace};

/* ======================== DebounceConfig ============================ */

#[derive(Debug, Clone)]
pub struct DebounceConfig {
    pub delay: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self::search_input()
    }
}

impl DebounceConfig {
    /// Quick config for search input debouncing
    #[must_use]
    pub const fn search_input() -> Self {
        Self {
            delay: Duration::from_millis(300),
        }
    }

    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

/* ============================ Settled ============================== */

/// A value that survived a full idle period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled<T> {
    pub generation: u64,
    pub value: T,
}

/* ============================ Debouncer ============================ */

pub struct Debouncer<T, M> {
    cfg: DebounceConfig,
    generation: u64,
    /// Last generation handed to the consumer; a repeat delivery is stale.
    acknowledged: u64,
    pending: Option<T>,
    sleeper: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<M>,
}

impl<T, M> Debouncer<T, M>
where
    T: Clone + Send + 'static,
    M: From<Settled<T>> + Send + 'static,
{
    /// Create a debouncer delivering into an existing channel.
    #[must_use]
    pub fn new(cfg: DebounceConfig, tx: mpsc::UnboundedSender<M>) -> Self {
        Self {
            cfg,
            generation: 0,
            acknowledged: 0,
            pending: None,
            sleeper: None,
            tx,
        }
    }

    /// Submit a new raw value, restarting the delay. Must run inside a Tokio
    /// runtime.
    pub fn submit(&mut self, value: T) -> u64 {
        self.cancel_sleeper();

        self.generation += 1;
        self.pending = Some(value.clone());

        let generation = self.generation;
        let deadline = Instant::now() + self.cfg.delay;
        let tx = self.tx.clone();

        trace!("Debouncer armed, generation {}", generation);
        self.sleeper = Some(tokio::spawn(async move {
            sleep_until(deadline).await;
            debug!("Debounce settled, generation {}", generation);
            // receiver gone means the consumer shut down
            let _ = tx.send(M::from(Settled { generation, value }));
        }));

        generation
    }

    /// Deliver the pending value now instead of waiting out the delay.
    pub fn flush(&mut self) {
        self.cancel_sleeper();
        if let Some(value) = self.pending.clone() {
            debug!("Debounce flushed, generation {}", self.generation);
            let _ = self.tx.send(M::from(Settled {
                generation: self.generation,
                value,
            }));
        }
    }

    /// Drop the pending value without delivering it. A delivery already in
    /// the channel is rejected by [`Debouncer::acknowledge`].
    pub fn cancel(&mut self) {
        self.cancel_sleeper();
        self.pending = None;
        self.acknowledged = self.generation;
    }

    /// Returns `true` the first time the latest generation is delivered, and
    /// clears the pending value. Older or repeated deliveries return `false`.
    pub fn acknowledge(&mut self, generation: u64) -> bool {
        if generation == self.generation && generation > self.acknowledged {
            self.acknowledged = generation;
            self.pending = None;
            true
        } else {
            trace!(
                "Ignoring stale debounce generation {} (latest {})",
                generation, self.generation
            );
            false
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.sleeper.as_ref().is_some_and(|h| !h.is_finished())
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    fn cancel_sleeper(&mut self) {
        if let Some(handle) = self.sleeper.take() {
            handle.abort();
        }
    }
}

impl<T, M> Drop for Debouncer<T, M> {
    fn drop(&mut self) {
        if let Some(handle) = self.sleeper.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    type Msg = Settled<String>;

    fn debouncer() -> (Debouncer<String, Msg>, mpsc::UnboundedReceiver<Msg>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Debouncer::new(DebounceConfig::search_input(), tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_input_settles_once_with_final_value() {
        let (mut deb, mut rx) = debouncer();

        deb.submit("z".into());
        sleep(Duration::from_millis(100)).await;
        deb.submit("zo".into());
        sleep(Duration::from_millis(299)).await;
        let last_submit = Instant::now();
        deb.submit("zoo".into());

        let settled = rx.recv().await.unwrap();
        assert_eq!(settled.value, "zoo");
        assert_eq!(settled.generation, 3);
        assert!(Instant::now() - last_submit >= Duration::from_millis(300));

        sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_delivered_before_delay() {
        let (mut deb, mut rx) = debouncer();

        deb.submit("art".into());
        assert!(deb.is_pending());
        sleep(Duration::from_millis(299)).await;
        assert!(rx.try_recv().is_err());

        sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.recv().await.unwrap().value, "art");
        assert!(!deb.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_delivers_immediately() {
        let (mut deb, mut rx) = debouncer();

        deb.submit("kite".into());
        deb.flush();
        let settled = rx.try_recv().unwrap();
        assert_eq!(settled, Settled { generation: 1, value: "kite".into() });

        sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let (mut deb, mut rx) = debouncer();

        deb.submit("lego".into());
        deb.cancel();
        deb.flush();
        sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_rejects_delivery_in_flight() {
        let (mut deb, mut rx) = debouncer();

        deb.submit("lego".into());
        let in_flight = rx.recv().await.unwrap();
        deb.cancel();
        assert!(!deb.acknowledge(in_flight.generation));
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_after_timer_fired_is_acknowledged_once() {
        let (mut deb, mut rx) = debouncer();

        deb.submit("kite".into());
        let fired = rx.recv().await.unwrap();
        deb.flush();
        let flushed = rx.try_recv().unwrap();
        assert_eq!(fired, flushed);

        assert!(deb.acknowledge(fired.generation));
        assert!(!deb.acknowledge(flushed.generation));
    }

    #[tokio::test]
    async fn test_acknowledge_rejects_stale_generation() {
        let (mut deb, _rx) = debouncer();

        let first = deb.submit("a".into());
        let second = deb.submit("ab".into());
        assert!(!deb.acknowledge(first));
        assert!(deb.acknowledge(second));
        assert_eq!(deb.generation(), 2);
    }
}
