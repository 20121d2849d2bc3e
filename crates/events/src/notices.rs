//! In-process notice bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`NoticeBus`] carries user-facing [`Notice`]s from the controllers to
//! whatever presentation layer is listening. It is designed to be shared
//! via `Arc<NoticeBus>`.

use sheetflow_core::notice::{Notice, NoticeLevel};
use tokio::sync::broadcast;

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 64;

/// Fan-out channel for user-facing notices.
///
/// # Usage
///
/// ```rust
/// use sheetflow_core::notice::Notice;
/// use sheetflow_events::NoticeBus;
///
/// let bus = NoticeBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(Notice::success("File uploaded successfully"));
/// ```
pub struct NoticeBus {
    sender: broadcast::Sender<Notice>,
}

impl NoticeBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed notices are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notice to all current subscribers and log it.
    ///
    /// If there are no active subscribers the notice is only logged.
    pub fn publish(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Warning | NoticeLevel::Error => {
                tracing::warn!(level = ?notice.level, "{}", notice.text)
            }
            NoticeLevel::Info | NoticeLevel::Success => {
                tracing::info!(level = ?notice.level, "{}", notice.text)
            }
        }
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(notice);
    }

    /// Subscribe to all notices published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }
}

impl Default for NoticeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
