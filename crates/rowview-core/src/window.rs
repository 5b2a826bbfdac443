#![forbid(unsafe_code)]

//! Visible-window derivation.
//!
//! Maps scroll state to the index range of rows that intersect the viewport.
//! The derivation is the windowing contract the whole renderer hangs off:
//! only rows in `start..end` are ever materialized, and the materialized band
//! is repositioned with a single translation so render cost stays
//! independent of the total row count.
//!
//! # Invariants
//!
//! 1. `0 <= start <= end <= total_rows` for all inputs.
//! 2. An invalid row height (unknown, non-finite, or `<= 0`) never fails the
//!    derivation; it degrades to [`DEFAULT_ROW_HEIGHT`] /
//!    [`MIN_VISIBLE_ROWS`].
//! 3. With scrolling enabled the window carries one extra row of slack so a
//!    partially scrolled-off leading row cannot open a gap at the bottom;
//!    when more than half the leading row is hidden a second slack row is
//!    added.

use crate::geometry::Viewport;
use core::ops::Range;

/// Fallback per-row height when none has been set or measured yet.
pub const DEFAULT_ROW_HEIGHT: f32 = 1.0;

/// Minimum visible row count reported when the row height is invalid.
pub const MIN_VISIBLE_ROWS: usize = 1;

/// The full scroll state a window derivation needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowParams {
    /// Total number of rows in the loaded dataset.
    pub total_rows: usize,
    /// Per-row pixel height. `None` until set or measured.
    pub row_height: Option<f32>,
    /// Size of the scrollable viewport.
    pub viewport: Viewport,
    /// Current scroll offset from the top, in pixels.
    pub scroll_top: f32,
    /// Whether the surface scrolls at all. When `false` the window is the
    /// fixed prefix of rows that fit the viewport.
    pub scroll_enabled: bool,
}

impl WindowParams {
    /// Row height if it is usable for division, `None` otherwise.
    #[inline]
    fn valid_row_height(&self) -> Option<f32> {
        match self.row_height {
            Some(h) if h.is_finite() && h > 0.0 => Some(h),
            _ => None,
        }
    }
}

/// A derived visible index range.
///
/// Recomputed on every render pass; holding one across passes is a bug in
/// the caller (the range is only meaningful against the scroll state it was
/// derived from).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleWindow {
    /// First visible row index (inclusive).
    pub start: usize,
    /// One past the last visible row index (exclusive).
    pub end: usize,
    /// The row height the derivation used, after fallback.
    pub row_height: f32,
    /// Pixel translation to apply to the materialized band so its first row
    /// lines up with `start`.
    pub translate_offset: f32,
}

impl VisibleWindow {
    /// An empty window at the origin.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            row_height: DEFAULT_ROW_HEIGHT,
            translate_offset: 0.0,
        }
    }

    /// Number of rows in the window.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the window contains no rows.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The window as an index range.
    #[inline]
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Widen the window by `overscan` rows on each side, saturating at the
    /// dataset edges.
    ///
    /// Overscan trades a few extra materialized rows for fewer enter/exit
    /// churns during fast scrolling. The translation is recomputed so the
    /// band still lines up with the widened `start`.
    #[must_use]
    pub fn with_overscan(self, overscan: usize, total_rows: usize) -> Self {
        if overscan == 0 || self.is_empty() {
            return self;
        }
        let start = self.start.saturating_sub(overscan);
        let end = self.end.saturating_add(overscan).min(total_rows);
        Self {
            start,
            end,
            row_height: self.row_height,
            translate_offset: start as f32 * self.row_height,
        }
    }
}

/// Number of rows that intersect the viewport.
///
/// With scrolling enabled this includes one row of partial-visibility slack
/// (`ceil + 1`); disabled, only fully visible rows count (`floor`). The
/// result is floored to [`MIN_VISIBLE_ROWS`] so downstream math never sees a
/// zero-row viewport.
fn visible_row_count(params: &WindowParams) -> usize {
    let Some(row_height) = params.valid_row_height() else {
        return MIN_VISIBLE_ROWS;
    };
    let viewport_height = params.viewport.sane_height();
    let fitted = if params.scroll_enabled {
        ((viewport_height / row_height).ceil() as usize).saturating_add(1)
    } else {
        (viewport_height / row_height).floor() as usize
    };
    fitted.min(params.total_rows).max(MIN_VISIBLE_ROWS)
}

/// Derive the visible window from the given scroll state.
///
/// Pure; no side effects. See the module invariants for the guarantees.
#[must_use]
pub fn compute_window(params: &WindowParams) -> VisibleWindow {
    let row_height = params.valid_row_height().unwrap_or(DEFAULT_ROW_HEIGHT);
    let visible_rows = visible_row_count(params);
    let total_rows = params.total_rows;

    // scroll_top == 0 maps to position 0 without touching the division, so
    // a zero offset can never pick up float artifacts.
    let scroll_top = if params.scroll_top.is_finite() {
        params.scroll_top.max(0.0)
    } else {
        0.0
    };
    let scroll_position = if scroll_top == 0.0 {
        0
    } else {
        (scroll_top / row_height).floor() as usize
    };

    let max_start = total_rows.saturating_add(1).saturating_sub(visible_rows);
    let start = scroll_position.min(max_start);
    let mut end = start.saturating_add(visible_rows).min(total_rows);

    if params.scroll_enabled {
        // Hidden height of the leading row; past half a row the bottom of
        // the viewport would show a gap without one more rendered row.
        let top_row_hidden = scroll_top - scroll_position as f32 * row_height;
        if top_row_hidden > row_height * 0.5 {
            end = end.saturating_add(1).min(total_rows);
        }
    }

    VisibleWindow {
        start,
        end,
        row_height,
        translate_offset: start as f32 * row_height,
    }
}

/// Total scrollable extent the surface should report.
///
/// With scrolling enabled this is the height of the entire dataset at the
/// effective row height; disabled, the surface simply fills the viewport.
#[must_use]
pub fn scroll_extent(params: &WindowParams) -> f32 {
    if params.scroll_enabled {
        let row_height = params.valid_row_height().unwrap_or(DEFAULT_ROW_HEIGHT);
        (params.total_rows as f32 * row_height).max(0.0)
    } else {
        params.viewport.sane_height()
    }
}
