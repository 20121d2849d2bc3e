//! Integration tests for `ChartFeed`.

mod common;

use std::sync::Arc;

use serde_json::json;
use sheetflow_core::chart::{ChartPoint, ChartSeries};
use sheetflow_workflow::ChartFeed;

use common::{Calls, FakeTransport};

fn feed() -> (Arc<FakeTransport>, ChartFeed) {
    let fake = Arc::new(FakeTransport::new());
    let feed = ChartFeed::new(fake.clone());
    (fake, feed)
}

#[tokio::test]
async fn fetch_normalizes_and_publishes() {
    let (fake, feed) = feed();
    fake.set_chart(Ok(vec![
        json!({"producto": "Pan", "total": 3}),
        json!({"product": "Leche", "cantidad": "2.6"}),
        json!({"foo": 1}),
    ]));
    let mut sub = feed.subscribe();

    let series = feed.fetch_chart_data().await.unwrap();

    assert_eq!(series.labels(), vec!["Pan", "Leche", "Unknown"]);
    assert_eq!(series.values(), vec![3, 3, 0]);
    assert!(sub.recv().await.unwrap().is_empty());
    assert_eq!(sub.recv().await.unwrap(), series);
    assert_eq!(Calls::get(&fake.calls.chart), 1);
}

#[tokio::test]
async fn failed_fetch_leaves_state_unchanged() {
    let (fake, feed) = feed();
    let held = ChartSeries::new(vec![ChartPoint::new("Pan", 7)]);
    feed.set_chart_data(held.clone());
    let mut sub = feed.subscribe();
    assert_eq!(*sub.recv().await.unwrap(), held);

    fake.set_chart(Err(502));
    assert!(feed.fetch_chart_data().await.is_none());

    assert_eq!(*feed.current(), held);
    assert!(sub.try_recv().is_none());
}

#[tokio::test]
async fn late_subscriber_gets_latest_series() {
    let (fake, feed) = feed();
    fake.set_chart(Ok(vec![json!({"producto": "Pan", "total": 1})]));
    feed.fetch_chart_data().await;
    fake.set_chart(Ok(vec![json!({"producto": "Pan", "total": 9})]));
    feed.fetch_chart_data().await;

    let mut sub = feed.subscribe();
    assert_eq!(sub.recv().await.unwrap().values(), vec![9]);
    assert!(sub.try_recv().is_none());
}

#[tokio::test]
async fn empty_backend_response_yields_no_data() {
    let (_fake, feed) = feed();

    let series = feed.fetch_chart_data().await.unwrap();

    assert!(series.is_empty());
    assert!(!series.has_data());
}
