#![forbid(unsafe_code)]

//! Lazy asynchronous row-height measurement.
//!
//! When the host has not supplied a row height, the renderer materializes a
//! single probe row and waits for the surface to lay it out. Layout happens
//! at the host's pace, so the wait spans ticks: the prober arms a
//! measurement pass, and on later ticks polls the surface's reading until
//! one arrives or the pass is superseded.
//!
//! At most one pass is ever live. Arming a new pass cancels the previous
//! one, and a cancelled pass can never resolve — its late reading is simply
//! never looked at. This is the cancellation-over-locking half of the
//! renderer's concurrency contract: correctness comes from making stale
//! results unobservable, not from excluding them in time.

use crate::cancellation::{CancellationSource, CancellationToken};

/// Result of polling the prober on a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasureOutcome {
    /// No measurement pass is live.
    Idle,
    /// A pass is live but the surface has not produced a usable reading yet.
    Pending,
    /// The pass resolved to a measured row height in pixels.
    Resolved(f32),
}

/// One-shot, cancellable row-height measurement.
#[derive(Debug, Default)]
pub struct HeightProber {
    pass: Option<CancellationSource>,
}

impl HeightProber {
    /// Create a prober with no pass live.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a measurement pass, superseding (cancelling) any live one.
    ///
    /// The returned token observes the new pass; holders of the old pass's
    /// token will see it cancelled.
    pub fn begin(&mut self) -> CancellationToken {
        if let Some(old) = self.pass.take() {
            old.cancel();
            #[cfg(feature = "tracing")]
            tracing::debug!("height probe superseded");
        }
        let source = CancellationSource::new();
        let token = source.token();
        self.pass = Some(source);
        #[cfg(feature = "tracing")]
        tracing::debug!("height probe armed");
        token
    }

    /// Feed the surface's current reading into the live pass.
    ///
    /// A reading is usable once it is finite and positive; anything else
    /// means the surface has not laid out yet and the pass stays pending.
    /// A surface that never lays out leaves the pass pending until it is
    /// superseded or cancelled — the prober never times out on its own.
    pub fn poll(&mut self, reading: Option<f32>) -> MeasureOutcome {
        let Some(pass) = &self.pass else {
            return MeasureOutcome::Idle;
        };
        if pass.is_cancelled() {
            self.pass = None;
            return MeasureOutcome::Idle;
        }
        match reading {
            Some(px) if px.is_finite() && px > 0.0 => {
                self.pass = None;
                #[cfg(feature = "tracing")]
                tracing::debug!(height = px, "height probe resolved");
                MeasureOutcome::Resolved(px)
            }
            _ => MeasureOutcome::Pending,
        }
    }

    /// Cancel the live pass, if any. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(pass) = self.pass.take() {
            pass.cancel();
            #[cfg(feature = "tracing")]
            tracing::debug!("height probe cancelled");
        }
    }

    /// Whether a pass is live.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pass.is_some()
    }
}
