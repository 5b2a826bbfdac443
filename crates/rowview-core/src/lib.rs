#![forbid(unsafe_code)]

//! Core: pure viewport math for virtualized row rendering.
//!
//! # Role in rowview
//! `rowview-core` is the computation layer. It owns the types describing a
//! scroll viewport and the derivation of the visible row window from scroll
//! state. Nothing here performs I/O, holds callbacks, or mutates shared
//! state; every function is a pure mapping from inputs to outputs and is
//! callable concurrently without coordination.
//!
//! # Primary responsibilities
//! - **Viewport**: the pixel-space size of the scrollable area.
//! - **WindowParams**: the full scroll state a window derivation needs.
//! - **VisibleWindow**: the derived index range, recomputed every render and
//!   never stored durably.
//!
//! # How it fits in the system
//! The renderer crate (`rowview`) feeds its current state through
//! [`compute_window`](window::compute_window) on every render pass and hands
//! the result to its reconciler. Keeping the math here means the windowing
//! behavior is testable exhaustively without a surface or presenter.

pub mod geometry;
pub mod window;

pub use geometry::Viewport;
pub use window::{
    DEFAULT_ROW_HEIGHT, MIN_VISIBLE_ROWS, VisibleWindow, WindowParams, compute_window,
    scroll_extent,
};
