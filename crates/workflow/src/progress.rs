//! Time-based synthetic progress for operations that report none.
//!
//! An insertion gives no progress signal, so while it is outstanding a
//! background task bumps a shared percentage by a fixed step at a fixed
//! interval, never past a cap below 100. The real completion cancels the
//! task and waits for it, so no tick can land after the final value is
//! written.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;

/// Handle to a running synthetic progress animation.
///
/// The cancellation token is the single authoritative phase: the task
/// checks it before every write. Dropping the handle cancels the task.
pub struct SyntheticProgress {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl SyntheticProgress {
    /// Start ticking `progress` upward by `step` every `interval`, stopping at `cap`.
    ///
    /// The first tick happens one `interval` after the start.
    pub fn start(progress: Arc<watch::Sender<u8>>, step: u8, interval: Duration, cap: u8) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                if token.is_cancelled() {
                    break;
                }

                let mut at_cap = false;
                progress.send_modify(|value| {
                    if *value < cap {
                        *value = value.saturating_add(step).min(cap);
                    }
                    at_cap = *value >= cap;
                });
                if at_cap {
                    tracing::trace!(cap, "Synthetic progress reached its cap");
                    break;
                }
            }
        });

        Self {
            cancel,
            handle: Some(handle),
        }
    }

    /// Stop the animation and wait for its task to exit.
    pub async fn finish(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for SyntheticProgress {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (Arc<watch::Sender<u8>>, watch::Receiver<u8>) {
        let (tx, rx) = watch::channel(0);
        (Arc::new(tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_at_fixed_interval() {
        let (tx, rx) = channel();
        let animation = SyntheticProgress::start(tx, 5, Duration::from_millis(100), 95);

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(*rx.borrow(), 10);

        animation.finish().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stops_at_cap() {
        let (tx, rx) = channel();
        let animation = SyntheticProgress::start(tx, 5, Duration::from_millis(100), 95);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(*rx.borrow(), 95);

        animation.finish().await;
    }

    #[tokio::test(start_paused = true)]
    async fn step_never_overshoots_cap() {
        let (tx, rx) = channel();
        let animation = SyntheticProgress::start(tx, 40, Duration::from_millis(10), 90);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*rx.borrow(), 90);

        animation.finish().await;
    }

    #[tokio::test(start_paused = true)]
    async fn no_ticks_after_finish() {
        let (tx, rx) = channel();
        let animation =
            SyntheticProgress::start(Arc::clone(&tx), 5, Duration::from_millis(100), 95);

        tokio::time::sleep(Duration::from_millis(150)).await;
        animation.finish().await;
        tx.send_replace(100);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(*rx.borrow(), 100);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels() {
        let (tx, rx) = channel();
        let animation = SyntheticProgress::start(tx, 5, Duration::from_millis(100), 95);

        tokio::time::sleep(Duration::from_millis(150)).await;
        drop(animation);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(*rx.borrow(), 5);
    }
}
