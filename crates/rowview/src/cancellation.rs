#![forbid(unsafe_code)]

//! Cooperative cancellation tokens for measurement passes.
//!
//! [`CancellationSource`] is the control side held by whoever starts an
//! asynchronous pass; [`CancellationToken`] is the cheap, cloneable observer
//! side carried by the pass itself. The prober supersedes a still-pending
//! measurement by cancelling its source and arming a fresh one, so a stale
//! pass can never resolve into current state.
//!
//! Tokens are poll-only: the tick model never blocks, so there is no
//! waiting primitive here. The token is still thread-safe — hosts sometimes
//! hand measurement callbacks to layout threads, and an `Arc<AtomicBool>`
//! costs nothing over a `Cell`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cheap, cloneable cancellation observer.
///
/// All clones observe the same source; once cancelled, always cancelled.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

/// The control handle that triggers cancellation.
///
/// Dropping the source does **not** cancel outstanding tokens — call
/// [`cancel`](Self::cancel) explicitly. This keeps scope exit from silently
/// discarding a pass that is still supposed to resolve.
#[derive(Debug)]
pub struct CancellationSource {
    cancelled: Arc<AtomicBool>,
}

impl CancellationSource {
    /// Create a new source with an uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Obtain a token that observes this source's state.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken {
    /// Returns `true` if cancellation has been requested.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
