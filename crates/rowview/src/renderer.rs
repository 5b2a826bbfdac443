#![forbid(unsafe_code)]

//! Render-cycle orchestration.
//!
//! [`Renderer`] owns the scroll-sensing surface and wires the leaves — the
//! coalescer, the viewport math, the prober, the reconciler, the pagination
//! gate — into one coherent cycle:
//!
//! ```text
//! Idle ──mutation──▶ Dirty ──tick──▶ Measuring? ──▶ Reconciling ──▶ Idle
//!                                       │  ▲
//!                                       ╰──╯ (height pending across ticks)
//! ```
//!
//! `Reconciling` is transient: it runs to completion inside a single
//! [`tick`](Renderer::tick) and is never observable between calls.
//! `TornDown` is terminal; every public method on a torn-down renderer is a
//! no-op so redundant cleanup from host lifecycles stays harmless.

use crate::coalescer::ScheduleCoalescer;
use crate::measure::{HeightProber, MeasureOutcome};
use crate::pagination::{DEFAULT_LOAD_MORE_THRESHOLD, PaginationGate};
use crate::reconciler::RowReconciler;
use crate::{RowPresenter, ScrollSurface};
use bitflags::bitflags;
use core::fmt;
use rowview_core::{
    DEFAULT_ROW_HEIGHT, Viewport, VisibleWindow, WindowParams, compute_window, scroll_extent,
};
#[cfg(feature = "tracing")]
use web_time::Instant;

bitflags! {
    /// Why the next pass was requested. Cleared when a pass completes;
    /// diagnostic only — the pass always reads whole-current state, never a
    /// snapshot keyed to a reason.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DirtyReasons: u8 {
        /// The dataset was replaced.
        const DATA       = 1 << 0;
        /// The viewport size changed.
        const VIEWPORT   = 1 << 1;
        /// The row height was set or invalidated.
        const ROW_HEIGHT = 1 << 2;
        /// The surface reported a scroll.
        const SCROLL     = 1 << 3;
    }
}

/// Observable renderer state between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    /// Nothing scheduled.
    Idle,
    /// A pass is armed for the next tick.
    Dirty,
    /// A height measurement is in flight.
    Measuring,
    /// Destroyed; all calls are no-ops.
    TornDown,
}

/// Construction-time knobs.
#[derive(Debug, Clone)]
pub struct RendererOptions {
    /// Per-row pixel height, if the host already knows it. `None` defers to
    /// lazy measurement on first render.
    pub row_height: Option<f32>,
    /// Whether the surface scrolls. Default `true`.
    pub scroll_enabled: bool,
    /// Load-more threshold fraction. Default
    /// [`DEFAULT_LOAD_MORE_THRESHOLD`].
    pub load_more_threshold: f32,
    /// Extra rows materialized on each side of the window. Default 0.
    pub overscan: usize,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            row_height: None,
            scroll_enabled: true,
            load_more_threshold: DEFAULT_LOAD_MORE_THRESHOLD,
            overscan: 0,
        }
    }
}

impl RendererOptions {
    /// Set a known row height up front.
    #[must_use]
    pub fn with_row_height(mut self, px: f32) -> Self {
        self.row_height = Some(px);
        self
    }

    /// Enable or disable scrolling.
    #[must_use]
    pub fn with_scroll_enabled(mut self, enabled: bool) -> Self {
        self.scroll_enabled = enabled;
        self
    }

    /// Set the load-more threshold fraction.
    #[must_use]
    pub fn with_load_more_threshold(mut self, fraction: f32) -> Self {
        self.load_more_threshold = fraction;
        self
    }

    /// Set the overscan row count.
    #[must_use]
    pub fn with_overscan(mut self, rows: usize) -> Self {
        self.overscan = rows;
        self
    }
}

/// The virtualized row renderer.
///
/// Generic over the row type `T`, the presentation seam `P`, and the
/// surface seam `S`; see the crate docs for the cooperative tick model.
pub struct Renderer<T, P, S>
where
    T: Clone,
    P: RowPresenter<T>,
    S: ScrollSurface,
{
    presenter: P,
    surface: S,
    data: Vec<T>,
    /// Effective row height: always `None` or a ceiled positive value.
    row_height: Option<f32>,
    viewport: Viewport,
    scroll_enabled: bool,
    overscan: usize,
    coalescer: ScheduleCoalescer,
    prober: HeightProber,
    gate: PaginationGate,
    reconciler: RowReconciler<T, P::Key>,
    last_window: Option<VisibleWindow>,
    dirty: DirtyReasons,
    torn_down: bool,
}

impl<T, P, S> fmt::Debug for Renderer<T, P, S>
where
    T: Clone,
    P: RowPresenter<T>,
    S: ScrollSurface,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("rows", &self.data.len())
            .field("row_height", &self.row_height)
            .field("viewport", &self.viewport)
            .field("handles", &self.reconciler.len())
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

/// Ceil a host-supplied or measured height, rejecting unusable values.
///
/// Ceiling keeps the band translation and the scroll extent in integral
/// agreement no matter which path produced the height.
fn sanitize_height(px: f32) -> Option<f32> {
    if px.is_finite() && px > 0.0 {
        Some(px.ceil())
    } else {
        None
    }
}

impl<T, P, S> Renderer<T, P, S>
where
    T: Clone,
    P: RowPresenter<T>,
    S: ScrollSurface,
{
    /// Create a renderer over the given seams.
    #[must_use]
    pub fn new(presenter: P, surface: S, options: RendererOptions) -> Self {
        Self {
            presenter,
            surface,
            data: Vec::new(),
            row_height: options.row_height.and_then(sanitize_height),
            viewport: Viewport::default(),
            scroll_enabled: options.scroll_enabled,
            overscan: options.overscan,
            coalescer: ScheduleCoalescer::new(),
            prober: HeightProber::new(),
            gate: PaginationGate::new(options.load_more_threshold),
            reconciler: RowReconciler::new(),
            last_window: None,
            dirty: DirtyReasons::empty(),
            torn_down: false,
        }
    }

    /// Replace the dataset and schedule a pass.
    ///
    /// Any `set_data` call is the data-arrival signal that re-opens the
    /// pagination gate — appends pass `reset_scroll = false` so the scroll
    /// position survives; structural resets pass `true`, which zeroes the
    /// surface's scroll offset before the next cycle.
    ///
    /// A height measurement in flight is cancelled: it was probing a row
    /// that may no longer exist.
    pub fn set_data(&mut self, rows: Vec<T>, reset_scroll: bool) {
        if self.torn_down {
            return;
        }
        self.data = rows;
        self.gate.notify_data_arrived();
        self.prober.cancel();
        if reset_scroll {
            self.surface.set_scroll_top(0.0);
        }
        self.dirty |= DirtyReasons::DATA;
        self.coalescer.schedule();
    }

    /// Set the per-row height and schedule a pass.
    ///
    /// The value is ceiled. A non-finite or non-positive height marks the
    /// height unknown again, deferring to measurement on the next cycle. A
    /// usable caller-set height supersedes any measurement in flight.
    pub fn set_row_height(&mut self, px: f32) {
        if self.torn_down {
            return;
        }
        self.row_height = sanitize_height(px);
        if self.row_height.is_some() {
            self.prober.cancel();
        }
        self.dirty |= DirtyReasons::ROW_HEIGHT;
        self.coalescer.schedule();
    }

    /// Set the viewport size and schedule a pass.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.torn_down {
            return;
        }
        self.viewport = viewport;
        self.dirty |= DirtyReasons::VIEWPORT;
        self.coalescer.schedule();
    }

    /// Schedule a pass without changing any input.
    pub fn render(&mut self) {
        if self.torn_down {
            return;
        }
        self.coalescer.schedule();
    }

    /// The surface's scroll offset changed.
    ///
    /// Scrolling re-renders within the same call when the row height is
    /// known — a scroll pass must not lag a tick behind the user's finger.
    /// With the height still unmeasured the pass is deferred like any other
    /// mutation, since it cannot reconcile meaningfully yet.
    pub fn on_scroll(&mut self) {
        if self.torn_down {
            return;
        }
        self.dirty |= DirtyReasons::SCROLL;
        if self.row_height.is_some() || self.data.is_empty() {
            self.run_cycle();
            // The pass read whole-current state; a previously armed tick
            // would only repeat it.
            self.coalescer.cancel_pending();
        } else {
            self.coalescer.schedule();
        }
    }

    /// Pump the cooperative scheduler. Call once per host frame.
    pub fn tick(&mut self) {
        if self.torn_down {
            return;
        }
        let fire = self.coalescer.take_fire();
        if !fire && !self.prober.is_pending() {
            return;
        }
        self.run_cycle();
    }

    /// Whether another [`tick`](Self::tick) has work to do.
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        !self.torn_down && (self.coalescer.is_armed() || self.prober.is_pending())
    }

    /// Empty the dataset and tear down every handle immediately.
    ///
    /// Unlike the scheduled mutations this reconciles inside the call, so
    /// the surface is clean when it returns. The pagination gate is left
    /// as-is; the next `set_data` re-opens it.
    pub fn clear(&mut self) {
        if self.torn_down {
            return;
        }
        self.data.clear();
        self.prober.cancel();
        self.run_reconcile_pass(false);
        self.coalescer.cancel_pending();
    }

    /// Tear down. Cancels pending work, exits all handles, and turns every
    /// later call into a no-op. Idempotent.
    pub fn destroy(&mut self) {
        if self.torn_down {
            return;
        }
        self.coalescer.cancel_pending();
        self.prober.cancel();
        self.reconciler.clear(&mut self.presenter);
        self.last_window = None;
        self.torn_down = true;
        #[cfg(feature = "tracing")]
        tracing::debug!("renderer torn down");
    }

    /// Observable phase between ticks.
    #[must_use]
    pub fn phase(&self) -> RenderPhase {
        if self.torn_down {
            RenderPhase::TornDown
        } else if self.prober.is_pending() {
            RenderPhase::Measuring
        } else if self.coalescer.is_armed() {
            RenderPhase::Dirty
        } else {
            RenderPhase::Idle
        }
    }

    /// The window materialized by the most recently completed pass.
    #[must_use]
    pub fn last_window(&self) -> Option<VisibleWindow> {
        self.last_window
    }

    /// Reasons accumulated since the last completed pass.
    #[must_use]
    pub fn dirty_reasons(&self) -> DirtyReasons {
        self.dirty
    }

    /// Effective row height, if known.
    #[must_use]
    pub fn row_height(&self) -> Option<f32> {
        self.row_height
    }

    /// Number of rows currently loaded.
    #[must_use]
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// Number of materialized handles.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        self.reconciler.len()
    }

    /// Whether a load-more request is outstanding.
    #[must_use]
    pub fn is_waiting_for_data(&self) -> bool {
        self.gate.is_waiting()
    }

    /// Whether the renderer has been destroyed.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Forwarded host read-mode hook (see [`RowPresenter::is_read_mode`]).
    #[must_use]
    pub fn read_mode(&self) -> bool {
        self.presenter.is_read_mode()
    }

    /// The presentation seam.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// The surface seam.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface seam, for hosts that drive scrolling
    /// through the renderer.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// One cycle of the state machine, height resolution included.
    fn run_cycle(&mut self) {
        if self.row_height.is_some() {
            self.run_reconcile_pass(true);
            return;
        }
        if self.data.is_empty() {
            // Nothing to probe. The window math falls back to the default
            // height for this pass; the height stays unknown so rows
            // arriving later still get measured.
            self.prober.cancel();
            self.run_reconcile_pass(true);
            return;
        }
        if self.prober.is_pending() {
            match self.prober.poll(self.surface.measured_row_height()) {
                MeasureOutcome::Resolved(px) => {
                    self.row_height = sanitize_height(px);
                    self.run_reconcile_pass(true);
                }
                MeasureOutcome::Pending => {
                    // Still waiting on the laid-out boundary.
                }
                MeasureOutcome::Idle => {
                    self.begin_probe();
                }
            }
            return;
        }
        self.begin_probe();
    }

    /// Materialize exactly one row so the surface has something to lay
    /// out, then wait for the measurement on later ticks.
    fn begin_probe(&mut self) {
        let _token = self.prober.begin();
        let probe = VisibleWindow {
            start: 0,
            end: self.data.len().min(1),
            row_height: DEFAULT_ROW_HEIGHT,
            translate_offset: 0.0,
        };
        self.reconciler
            .reconcile(&probe, &self.data, &mut self.presenter, &mut self.surface);
    }

    /// The reconciling half of a cycle: extent, window, handles, gate.
    fn run_reconcile_pass(&mut self, check_gate: bool) {
        #[cfg(feature = "tracing")]
        let started = Instant::now();

        let total_rows = self.data.len();
        let params = WindowParams {
            total_rows,
            row_height: self.row_height,
            viewport: self.viewport,
            scroll_top: self.surface.scroll_top(),
            scroll_enabled: self.scroll_enabled,
        };
        self.surface.set_scroll_extent(scroll_extent(&params));

        let base = compute_window(&params);
        let window = base.with_overscan(self.overscan, total_rows);
        self.reconciler
            .reconcile(&window, &self.data, &mut self.presenter, &mut self.surface);
        self.last_window = Some(window);

        if check_gate {
            let presenter = &mut self.presenter;
            self.gate
                .maybe_request_more(&base, total_rows, || presenter.load_more());
        }
        self.dirty = DirtyReasons::empty();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            start = window.start,
            end = window.end,
            total_rows,
            handles = self.reconciler.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "render pass"
        );
    }
}
