#![forbid(unsafe_code)]

//! Backpressured load-more requests.
//!
//! When the visible window advances past a configurable fraction of the
//! loaded data, the host is asked for more. The gate enforces the
//! backpressure half of that contract: once fired it stays closed until the
//! renderer observes a data-arrival signal, so any number of render passes
//! while the host is fetching produce exactly one outstanding request.
//!
//! The gate never fires while the whole dataset is already visible —
//! virtualization is inactive then and more data would not change what is
//! on screen.

use rowview_core::VisibleWindow;

/// Fraction of loaded data the window end must cross before a load-more
/// request fires.
pub const DEFAULT_LOAD_MORE_THRESHOLD: f32 = 0.8;

/// At-most-one-outstanding load-more gate.
#[derive(Debug, Clone)]
pub struct PaginationGate {
    threshold: f32,
    waiting: bool,
}

impl Default for PaginationGate {
    fn default() -> Self {
        Self::new(DEFAULT_LOAD_MORE_THRESHOLD)
    }
}

impl PaginationGate {
    /// Create a gate with the given threshold fraction.
    ///
    /// Out-of-range thresholds are clamped into `(0, 1]`; a very low
    /// threshold effectively requests more data on every pass, which is
    /// still backpressured to one outstanding request.
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        let threshold = if threshold.is_finite() {
            threshold.clamp(f32::EPSILON, 1.0)
        } else {
            DEFAULT_LOAD_MORE_THRESHOLD
        };
        Self {
            threshold,
            waiting: false,
        }
    }

    /// Fire `request_more` if the window warrants it and no request is
    /// outstanding. Returns whether a request fired this pass.
    pub fn maybe_request_more(
        &mut self,
        window: &VisibleWindow,
        total_rows: usize,
        request_more: impl FnOnce(),
    ) -> bool {
        if self.waiting {
            return false;
        }
        // Whole dataset on screen: virtualization inactive, nothing to gain.
        if window.len() == total_rows {
            return false;
        }
        if (window.end as f32) < total_rows as f32 * self.threshold {
            return false;
        }
        self.waiting = true;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            end = window.end,
            total_rows,
            threshold = self.threshold,
            "load-more fired"
        );
        request_more();
        true
    }

    /// The host answered with new data; re-open the gate.
    pub fn notify_data_arrived(&mut self) {
        self.waiting = false;
    }

    /// Whether a request is outstanding.
    #[inline]
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: usize, end: usize) -> VisibleWindow {
        VisibleWindow {
            start,
            end,
            row_height: 10.0,
            translate_offset: 0.0,
        }
    }

    #[test]
    fn fires_past_threshold() {
        let mut gate = PaginationGate::default();
        let mut fired = 0;
        assert!(gate.maybe_request_more(&window(795, 801), 1000, || fired += 1));
        assert_eq!(fired, 1);
    }

    #[test]
    fn quiet_below_threshold() {
        let mut gate = PaginationGate::default();
        let mut fired = 0;
        assert!(!gate.maybe_request_more(&window(0, 6), 1000, || fired += 1));
        assert_eq!(fired, 0);
    }

    #[test]
    fn fires_once_until_data_arrives() {
        let mut gate = PaginationGate::default();
        let mut fired = 0;
        for _ in 0..5 {
            gate.maybe_request_more(&window(900, 906), 1000, || fired += 1);
        }
        assert_eq!(fired, 1);
        assert!(gate.is_waiting());

        gate.notify_data_arrived();
        assert!(gate.maybe_request_more(&window(1100, 1106), 1200, || fired += 1));
        assert_eq!(fired, 2);
    }

    #[test]
    fn inactive_when_everything_is_visible() {
        let mut gate = PaginationGate::default();
        let mut fired = 0;
        // end (3) is past 0.8 * 3 but the whole dataset is on screen.
        assert!(!gate.maybe_request_more(&window(0, 3), 3, || fired += 1));
        assert_eq!(fired, 0);
    }

    #[test]
    fn empty_dataset_never_fires() {
        let mut gate = PaginationGate::default();
        let mut fired = 0;
        assert!(!gate.maybe_request_more(&window(0, 0), 0, || fired += 1));
        assert_eq!(fired, 0);
    }

    #[test]
    fn exact_threshold_boundary_fires() {
        let mut gate = PaginationGate::default();
        let mut fired = 0;
        // end == 0.8 * total exactly.
        assert!(gate.maybe_request_more(&window(794, 800), 1000, || fired += 1));
        assert_eq!(fired, 1);
    }

    #[test]
    fn hostile_thresholds_are_clamped() {
        for t in [f32::NAN, f32::INFINITY, 0.0, -1.0, 7.0] {
            let gate = PaginationGate::new(t);
            assert!(
                gate.threshold > 0.0 && gate.threshold <= 1.0,
                "threshold {t} not clamped"
            );
        }
    }
}
