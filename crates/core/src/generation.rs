//! Request generation tokens.
//!
//! Responses can resolve out of issue order. Each request takes a
//! [`Generation`] from its [`RequestGeneration`] counter; when the response
//! arrives the owner checks whether the token is still the latest and drops
//! the response otherwise.

use std::sync::atomic::{AtomicU64, Ordering};

/// Token identifying one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// Monotonic per-operation request counter.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: AtomicU64,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier token.
    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `generation` is still the most recent request.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::SeqCst) == generation.0
    }
}
