#![forbid(unsafe_code)]

//! Virtualized incremental row renderer.
//!
//! # Role in rowview
//! `rowview` is the stateful layer on top of [`rowview_core`]'s pure window
//! math. It materializes only the rows intersecting the current scroll
//! window, reuses previously materialized rows when their identity is
//! stable, measures row height lazily when the host has not supplied one,
//! and asks the host for more data when the visible window approaches the
//! end of what has been loaded.
//!
//! # Primary responsibilities
//! - **[`Renderer`]**: the orchestrator and public contract.
//! - **[`RowReconciler`]**: enter/update/exit handle reconciliation.
//! - **[`HeightProber`]**: cancellable asynchronous row-height measurement.
//! - **[`PaginationGate`]**: backpressured load-more requests.
//! - **[`ScheduleCoalescer`]**: one render pass per scheduling tick.
//!
//! # Cooperative scheduling
//! The renderer is headless and single-threaded: the host owns the loop and
//! pumps [`Renderer::tick`] once per frame (or whenever it likes). State
//! mutations mark the renderer dirty and coalesce into a single pass on the
//! next tick; the asynchronous parts (height measurement) span ticks and are
//! cancelled, never blocked on.
//!
//! # Example
//!
//! ```ignore
//! use rowview::{Renderer, RendererOptions, RowPresenter, ScrollSurface};
//!
//! let mut renderer = Renderer::new(presenter, surface, RendererOptions::default());
//! renderer.set_data(rows, true);
//! while renderer.needs_tick() {
//!     renderer.tick();
//! }
//! ```

pub mod cancellation;
pub mod coalescer;
pub mod measure;
pub mod pagination;
pub mod reconciler;
pub mod renderer;

use std::hash::Hash;

pub use cancellation::{CancellationSource, CancellationToken};
pub use coalescer::ScheduleCoalescer;
pub use measure::{HeightProber, MeasureOutcome};
pub use pagination::{DEFAULT_LOAD_MORE_THRESHOLD, PaginationGate};
pub use reconciler::RowReconciler;
pub use renderer::{DirtyReasons, RenderPhase, Renderer, RendererOptions};
pub use rowview_core::{
    DEFAULT_ROW_HEIGHT, MIN_VISIBLE_ROWS, Viewport, VisibleWindow, WindowParams,
};

/// Presentation seam: how the renderer talks about rows without knowing what
/// a row is.
///
/// The renderer never inspects a row except through [`key`](Self::key) and
/// never draws anything itself; the presenter owns all presentation. Within
/// one render pass the callbacks are invoked strictly in the order
/// `enter` → `update` → `exit`, so a row entering a pass is also updated in
/// that same pass (enter does structural creation only; update applies the
/// current data-dependent presentation).
///
/// # Contract
/// [`key`](Self::key) must be stable across renders for the same logical
/// row, and distinct rows must produce distinct keys. Duplicate keys are not
/// detected; they degrade to missing or doubled rows, not to a panic.
pub trait RowPresenter<T> {
    /// Stable identity for matching a row across renders.
    type Key: Eq + Hash + Clone;

    /// Identity of a row. Must be stable for the row's lifetime.
    fn key(&self, row: &T) -> Self::Key;

    /// Rows newly in the visible window this pass. Structural creation only.
    fn enter(&mut self, rows: &[T]);

    /// Every row in the visible window this pass, in window order,
    /// including the ones that just entered.
    fn update(&mut self, rows: &[T]);

    /// Rows that left the visible window this pass.
    fn exit(&mut self, rows: &[T]);

    /// The host should load more data. Fired at most once until the host
    /// answers with a new `set_data` call; see [`PaginationGate`].
    fn load_more(&mut self) {}

    /// Whether the host is in read (non-edit) mode. Surfaces consult this
    /// before applying propagation-sensitive platform workarounds; the
    /// renderer itself only forwards it.
    fn is_read_mode(&self) -> bool {
        true
    }
}

/// Surface seam: the scroll-sensing render target.
///
/// Any platform that can report a scroll offset, report a laid-out row
/// height, and translate the materialized band can host the renderer: a DOM
/// container, a native scroll view, a terminal pane.
pub trait ScrollSurface {
    /// Current scroll offset from the top, in pixels.
    fn scroll_top(&self) -> f32;

    /// Jump the scroll offset (used for structural resets).
    fn set_scroll_top(&mut self, px: f32);

    /// Report the total scrollable extent so the surface can size its
    /// scrollbar.
    fn set_scroll_extent(&mut self, px: f32);

    /// Position the materialized band `px` below the scroll origin.
    fn translate(&mut self, px: f32);

    /// Measured on-screen height of the first materialized row, or `None`
    /// while the surface has not laid out yet. Polled across ticks by the
    /// [`HeightProber`].
    fn measured_row_height(&self) -> Option<f32>;
}
