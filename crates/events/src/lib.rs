//! Reactive state and notification plumbing for the ingestion pipeline.
//!
//! - [`ChartState`]: replay-latest holder for the normalized chart
//!   series, with one channel per subscriber.
//! - [`NoticeBus`]: fan-out of user-facing notices backed by
//!   `tokio::sync::broadcast`.

pub mod chart_state;
pub mod notices;

pub use chart_state::{ChartState, ChartSubscription, SubscriberId};
pub use notices::NoticeBus;
