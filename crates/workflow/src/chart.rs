//! Chart feed: backend fetch, normalization and publication.

use std::sync::Arc;

use sheetflow_client::FileTransport;
use sheetflow_core::chart::{normalize, ChartSeries};
use sheetflow_core::generation::RequestGeneration;
use sheetflow_events::{ChartState, ChartSubscription};

/// Producer side of the reactive chart state.
///
/// Owns the only write path into [`ChartState`]: either an explicit
/// [`set_chart_data`](Self::set_chart_data) or a
/// [`fetch_chart_data`](Self::fetch_chart_data) refresh.
pub struct ChartFeed {
    transport: Arc<dyn FileTransport>,
    state: Arc<ChartState>,
    generation: RequestGeneration,
}

impl ChartFeed {
    pub fn new(transport: Arc<dyn FileTransport>) -> Self {
        Self::with_state(transport, Arc::new(ChartState::new()))
    }

    pub fn with_state(transport: Arc<dyn FileTransport>, state: Arc<ChartState>) -> Self {
        Self {
            transport,
            state,
            generation: RequestGeneration::new(),
        }
    }

    /// Subscribe to the series; the current value is replayed first.
    pub fn subscribe(&self) -> ChartSubscription {
        self.state.subscribe()
    }

    pub fn state(&self) -> &Arc<ChartState> {
        &self.state
    }

    pub fn current(&self) -> Arc<ChartSeries> {
        self.state.current()
    }

    /// Replace the series and notify subscribers.
    pub fn set_chart_data(&self, series: ChartSeries) -> Arc<ChartSeries> {
        self.state.set_chart_data(series)
    }

    /// Fetch, normalize and publish the chart series.
    ///
    /// Transport failures are logged and swallowed: the held series is
    /// left unchanged and `None` is returned. A response that arrives
    /// after a newer fetch was started is dropped the same way.
    pub async fn fetch_chart_data(&self) -> Option<Arc<ChartSeries>> {
        let ticket = self.generation.begin();

        let raw = match self.transport.get_chart_data().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch chart data");
                return None;
            }
        };

        if !self.generation.is_current(ticket) {
            tracing::debug!("Discarding stale chart response");
            return None;
        }

        let series = normalize(&raw);
        tracing::debug!(
            records = raw.len(),
            has_data = series.has_data(),
            "Chart data normalized"
        );
        Some(self.set_chart_data(series))
    }
}
