//! Property-based invariant tests for visible-window derivation.
//!
//! These tests verify structural invariants that must hold for any valid inputs:
//!
//! 1. 0 <= start <= end <= total_rows, for all scroll states.
//! 2. Overscan expansion preserves the bounds of (1).
//! 3. The translated band plus one row of slack never exceeds the scroll
//!    extent.
//! 4. Scrolling arbitrarily far past the end still lands the window flush
//!    with the last row.
//! 5. Determinism: the same params always derive the same window.
//! 6. The derivation never panics on hostile float inputs.

use proptest::prelude::*;
use rowview_core::{Viewport, WindowParams, compute_window, scroll_extent};

fn arb_params() -> impl Strategy<Value = WindowParams> {
    (
        0usize..=5_000,
        prop_oneof![
            Just(None),
            (0.5f32..64.0).prop_map(Some),
            Just(Some(0.0)),
            Just(Some(-1.0)),
        ],
        0.0f32..2_000.0,
        0.0f32..200_000.0,
        any::<bool>(),
    )
        .prop_map(
            |(total_rows, row_height, viewport_height, scroll_top, scroll_enabled)| WindowParams {
                total_rows,
                row_height,
                viewport: Viewport::new(300.0, viewport_height),
                scroll_top,
                scroll_enabled,
            },
        )
}

proptest! {
    #[test]
    fn window_bounds_hold(p in arb_params()) {
        let w = compute_window(&p);
        prop_assert!(w.start <= w.end, "start {} > end {}", w.start, w.end);
        prop_assert!(w.end <= p.total_rows, "end {} > total {}", w.end, p.total_rows);
    }

    #[test]
    fn overscan_preserves_bounds(p in arb_params(), overscan in 0usize..32) {
        let w = compute_window(&p).with_overscan(overscan, p.total_rows);
        prop_assert!(w.start <= w.end);
        prop_assert!(w.end <= p.total_rows);
    }

    #[test]
    fn translate_stays_within_extent(p in arb_params()) {
        prop_assume!(p.scroll_enabled);
        let w = compute_window(&p);
        let extent = scroll_extent(&p);
        // The band starts at translate_offset; its rows must fit the extent
        // up to the one-row partial-visibility slack.
        let band_bottom = w.translate_offset + w.len() as f32 * w.row_height;
        prop_assert!(
            band_bottom <= extent + 2.0 * w.row_height,
            "band bottom {} vs extent {}",
            band_bottom,
            extent
        );
    }

    #[test]
    fn far_overscroll_lands_on_the_tail(p in arb_params()) {
        prop_assume!(p.total_rows > 0);
        let mut p = p;
        p.scroll_top = 1.0e12;
        let w = compute_window(&p);
        prop_assert_eq!(w.end, p.total_rows);
    }

    #[test]
    fn derivation_is_deterministic(p in arb_params()) {
        prop_assert_eq!(compute_window(&p), compute_window(&p));
    }

    #[test]
    fn no_panic_on_hostile_floats(
        total_rows in 0usize..=1000,
        row_height in prop_oneof![
            Just(f32::NAN), Just(f32::INFINITY), Just(f32::NEG_INFINITY),
            any::<f32>(),
        ],
        scroll_top in prop_oneof![
            Just(f32::NAN), Just(f32::INFINITY), Just(-1.0e30f32), any::<f32>(),
        ],
        viewport_height in prop_oneof![Just(f32::NAN), any::<f32>()],
    ) {
        let p = WindowParams {
            total_rows,
            row_height: Some(row_height),
            viewport: Viewport::new(100.0, viewport_height),
            scroll_top,
            scroll_enabled: true,
        };
        let w = compute_window(&p);
        let _ = scroll_extent(&p);
        prop_assert!(w.start <= w.end && w.end <= total_rows);
    }
}
