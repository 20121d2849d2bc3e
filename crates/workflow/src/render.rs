//! Bridge from the reactive chart state to a renderer.
//!
//! Drawing itself lives outside this crate. A [`ChartRenderer`] receives a
//! [`BarChart`] projection whenever the series changes; render failures are
//! logged and never roll back the data state, which has already been
//! updated by the time the renderer runs.

use sheetflow_core::chart::{BarChart, ChartSeries};
use sheetflow_events::ChartSubscription;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Chart render failed: {0}")]
    Failed(String),

    #[error("Chart output error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait ChartRenderer: Send {
    /// Draw a chart that has data.
    fn render(&mut self, chart: &BarChart) -> Result<(), RenderError>;

    /// Show the "no data" state.
    fn clear(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Render one series, or clear when it has no data.
///
/// Returns whether the renderer succeeded. Failures are logged only.
pub fn apply_series<R: ChartRenderer + ?Sized>(renderer: &mut R, series: &ChartSeries) -> bool {
    let chart = BarChart::from_series(series);
    let result = if chart.has_data {
        renderer.render(&chart)
    } else {
        renderer.clear()
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, points = series.len(), "Chart redraw failed");
            false
        }
    }
}

/// Feed every series from `subscription` into `renderer` until the state
/// goes away, then hand the renderer back.
pub async fn drive_renderer<R: ChartRenderer>(
    mut subscription: ChartSubscription,
    mut renderer: R,
) -> R {
    while let Some(series) = subscription.recv().await {
        apply_series(&mut renderer, &series);
    }
    renderer
}
