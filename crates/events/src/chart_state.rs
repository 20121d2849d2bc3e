//! Replay-latest holder for the current chart series.
//!
//! [`ChartState`] owns exactly one [`ChartSeries`] and a map of
//! subscriber id to channel sender. A new subscriber immediately receives
//! the current series; afterwards every [`ChartState::set_chart_data`]
//! call is delivered to all live subscribers in subscription order.
//! Nothing older than the latest value is ever replayed.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use sheetflow_core::chart::ChartSeries;
use tokio::sync::mpsc;

/// Identifier handed out per subscription. Increases monotonically, so
/// map order is subscription order.
pub type SubscriberId = u64;

/// Channel sender half for pushing series to one subscriber.
type SeriesSender = mpsc::UnboundedSender<Arc<ChartSeries>>;

struct Inner {
    current: Arc<ChartSeries>,
    next_id: SubscriberId,
    subscribers: BTreeMap<SubscriberId, SeriesSender>,
}

/// Shared current-value holder for the chart series.
///
/// Designed to be wrapped in `Arc` and shared between the producer
/// (the chart feed) and any number of renderers.
pub struct ChartState {
    inner: Mutex<Inner>,
}

/// Receiving end of a chart subscription.
pub struct ChartSubscription {
    id: SubscriberId,
    rx: mpsc::UnboundedReceiver<Arc<ChartSeries>>,
}

impl ChartSubscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next series. `None` once the state has been dropped.
    pub async fn recv(&mut self) -> Option<Arc<ChartSeries>> {
        self.rx.recv().await
    }

    /// Take the next series if one is already queued.
    pub fn try_recv(&mut self) -> Option<Arc<ChartSeries>> {
        self.rx.try_recv().ok()
    }

    /// Drain everything queued and keep only the newest series.
    pub fn latest(&mut self) -> Option<Arc<ChartSeries>> {
        let mut newest = None;
        while let Ok(series) = self.rx.try_recv() {
            newest = Some(series);
        }
        newest
    }
}

impl ChartState {
    /// Create a state holding an empty series.
    pub fn new() -> Self {
        Self::with_series(ChartSeries::default())
    }

    pub fn with_series(series: ChartSeries) -> Self {
        Self {
            inner: Mutex::new(Inner {
                current: Arc::new(series),
                next_id: 1,
                subscribers: BTreeMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a subscriber and replay the current series to it.
    pub fn subscribe(&self) -> ChartSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        let _ = tx.send(Arc::clone(&inner.current));
        inner.subscribers.insert(id, tx);
        ChartSubscription { id, rx }
    }

    /// Remove a subscriber by its id. Unknown ids are a no-op.
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.lock().subscribers.remove(&id);
    }

    /// Replace the held series and notify every live subscriber.
    ///
    /// Delivery happens synchronously, in subscription order, while the
    /// lock is held, so two concurrent producers can never interleave
    /// their notifications. Subscribers whose receiver has been dropped
    /// are pruned.
    pub fn set_chart_data(&self, series: ChartSeries) -> Arc<ChartSeries> {
        let series = Arc::new(series);
        let mut inner = self.lock();
        inner.current = Arc::clone(&series);
        inner
            .subscribers
            .retain(|_, tx| tx.send(Arc::clone(&series)).is_ok());
        tracing::debug!(
            points = series.len(),
            subscribers = inner.subscribers.len(),
            "Chart series updated"
        );
        series
    }

    /// The series currently held.
    pub fn current(&self) -> Arc<ChartSeries> {
        Arc::clone(&self.lock().current)
    }

    /// Number of registered subscribers (including not-yet-pruned dead ones).
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }
}

impl Default for ChartState {
    fn default() -> Self {
        Self::new()
    }
}
