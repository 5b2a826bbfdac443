#![forbid(unsafe_code)]

//! Keyed enter/update/exit reconciliation of materialized rows.
//!
//! The reconciler owns the set of render handles — one per currently
//! materialized row — and diffs it against the visible slice of the dataset
//! on every pass. Rows are matched by the presenter's stable key, so a row
//! that merely moved within the window keeps its handle instead of being
//! torn down and recreated.
//!
//! After the callbacks run, the surviving band is positioned with a single
//! translation. That is the windowing trick: an arbitrarily large dataset
//! needs only a thin band of handles, and the band slides as a unit.
//!
//! The reconciler is the *only* writer to the materialized set, and it runs
//! only inside a render pass; the renderer's shared-resource policy needs no
//! locking because of this.

use crate::{RowPresenter, ScrollSurface};
use ahash::{AHashMap, AHashSet};
use rowview_core::VisibleWindow;
use std::hash::Hash;

/// A materialized row. Owned exclusively by the reconciler; created on
/// enter, refreshed on update, dropped on exit.
#[derive(Debug, Clone)]
struct RenderHandle<T> {
    /// Copy of the row the handle was last refreshed with; handed back to
    /// the presenter when the row exits.
    row: T,
}

/// Diffs the visible slice against held handles and drives the presenter.
#[derive(Debug, Clone, Default)]
pub struct RowReconciler<T, K> {
    handles: AHashMap<K, RenderHandle<T>>,
}

impl<T, K> RowReconciler<T, K>
where
    T: Clone,
    K: Eq + Hash + Clone,
{
    /// Create a reconciler with no materialized rows.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handles: AHashMap::new(),
        }
    }

    /// Reconcile the materialized set against `data[window.start..window.end]`.
    ///
    /// Callbacks run strictly enter → update → exit within the pass. Empty
    /// groups are skipped rather than delivered as empty slices.
    ///
    /// The window is clamped to the data it is applied to, so a window
    /// derived a moment before a shrinking `set_data` cannot slice out of
    /// bounds.
    pub fn reconcile<P, S>(
        &mut self,
        window: &VisibleWindow,
        data: &[T],
        presenter: &mut P,
        surface: &mut S,
    ) where
        P: RowPresenter<T, Key = K>,
        S: ScrollSurface,
    {
        let end = window.end.min(data.len());
        let start = window.start.min(end);
        let visible = &data[start..end];

        // Keys of the incoming window. A duplicate key is a caller contract
        // violation; the first occurrence wins for handle bookkeeping.
        let mut incoming: AHashSet<K> = AHashSet::with_capacity(visible.len());
        let mut entered: Vec<T> = Vec::new();
        for row in visible {
            let key = presenter.key(row);
            if incoming.insert(key.clone()) && !self.handles.contains_key(&key) {
                entered.push(row.clone());
            }
        }

        if !entered.is_empty() {
            presenter.enter(&entered);
        }
        for row in visible {
            let key = presenter.key(row);
            self.handles
                .entry(key)
                .and_modify(|handle| handle.row = row.clone())
                .or_insert_with(|| RenderHandle { row: row.clone() });
        }

        if !visible.is_empty() {
            presenter.update(visible);
        }

        let mut exited: Vec<T> = Vec::new();
        self.handles.retain(|key, handle| {
            if incoming.contains(key) {
                true
            } else {
                exited.push(handle.row.clone());
                false
            }
        });
        if !exited.is_empty() {
            presenter.exit(&exited);
        }

        surface.translate(window.translate_offset);
    }

    /// Tear down every handle, notifying the presenter.
    pub fn clear<P>(&mut self, presenter: &mut P)
    where
        P: RowPresenter<T, Key = K>,
    {
        if self.handles.is_empty() {
            return;
        }
        let exited: Vec<T> = self.handles.drain().map(|(_, h)| h.row).collect();
        presenter.exit(&exited);
    }

    /// Number of materialized rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Check if nothing is materialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Whether a row with this key is materialized.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.handles.contains_key(key)
    }

    /// Keys of the materialized rows, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.handles.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowview_core::VisibleWindow;

    /// Minimal presenter recording callback payloads in order.
    #[derive(Default)]
    struct Log {
        events: Vec<(char, Vec<u32>)>,
    }

    impl RowPresenter<u32> for Log {
        type Key = u32;
        fn key(&self, row: &u32) -> u32 {
            *row
        }
        fn enter(&mut self, rows: &[u32]) {
            self.events.push(('e', rows.to_vec()));
        }
        fn update(&mut self, rows: &[u32]) {
            self.events.push(('u', rows.to_vec()));
        }
        fn exit(&mut self, rows: &[u32]) {
            self.events.push(('x', rows.to_vec()));
        }
    }

    #[derive(Default)]
    struct NullSurface {
        translate: f32,
    }

    impl ScrollSurface for NullSurface {
        fn scroll_top(&self) -> f32 {
            0.0
        }
        fn set_scroll_top(&mut self, _px: f32) {}
        fn set_scroll_extent(&mut self, _px: f32) {}
        fn translate(&mut self, px: f32) {
            self.translate = px;
        }
        fn measured_row_height(&self) -> Option<f32> {
            None
        }
    }

    fn window(start: usize, end: usize) -> VisibleWindow {
        VisibleWindow {
            start,
            end,
            row_height: 10.0,
            translate_offset: start as f32 * 10.0,
        }
    }

    fn sorted(mut v: Vec<u32>) -> Vec<u32> {
        v.sort_unstable();
        v
    }

    #[test]
    fn first_pass_enters_then_updates() {
        let data: Vec<u32> = (0..10).collect();
        let mut rec = RowReconciler::new();
        let mut log = Log::default();
        let mut surface = NullSurface::default();

        rec.reconcile(&window(0, 4), &data, &mut log, &mut surface);
        assert_eq!(
            log.events,
            vec![('e', vec![0, 1, 2, 3]), ('u', vec![0, 1, 2, 3])]
        );
        assert_eq!(rec.len(), 4);
    }

    #[test]
    fn sliding_window_reuses_overlap() {
        let data: Vec<u32> = (0..10).collect();
        let mut rec = RowReconciler::new();
        let mut log = Log::default();
        let mut surface = NullSurface::default();

        rec.reconcile(&window(0, 4), &data, &mut log, &mut surface);
        log.events.clear();
        rec.reconcile(&window(2, 6), &data, &mut log, &mut surface);

        assert_eq!(log.events.len(), 3);
        assert_eq!(log.events[0], ('e', vec![4, 5]));
        assert_eq!(log.events[1], ('u', vec![2, 3, 4, 5]));
        assert_eq!(sorted(log.events[2].1.clone()), vec![0, 1]);
        assert_eq!(surface.translate, 20.0);
    }

    #[test]
    fn zero_overlap_exits_all_enters_all() {
        let data: Vec<u32> = (0..100).collect();
        let mut rec = RowReconciler::new();
        let mut log = Log::default();
        let mut surface = NullSurface::default();

        rec.reconcile(&window(0, 4), &data, &mut log, &mut surface);
        log.events.clear();
        rec.reconcile(&window(50, 54), &data, &mut log, &mut surface);

        assert_eq!(log.events[0], ('e', vec![50, 51, 52, 53]));
        assert_eq!(log.events[1], ('u', vec![50, 51, 52, 53]));
        assert_eq!(log.events[2].0, 'x');
        assert_eq!(sorted(log.events[2].1.clone()), vec![0, 1, 2, 3]);
        assert_eq!(rec.len(), 4);
    }

    #[test]
    fn empty_window_tears_everything_down() {
        let data: Vec<u32> = (0..10).collect();
        let mut rec = RowReconciler::new();
        let mut log = Log::default();
        let mut surface = NullSurface::default();

        rec.reconcile(&window(0, 4), &data, &mut log, &mut surface);
        log.events.clear();
        rec.reconcile(&window(0, 0), &[], &mut log, &mut surface);

        assert_eq!(log.events.len(), 1);
        assert_eq!(log.events[0].0, 'x');
        assert!(rec.is_empty());
    }

    #[test]
    fn window_is_clamped_to_shrunk_data() {
        let mut rec = RowReconciler::new();
        let mut log = Log::default();
        let mut surface = NullSurface::default();

        // Window derived against 10 rows, applied against 3.
        let data: Vec<u32> = (0..3).collect();
        rec.reconcile(&window(5, 9), &data, &mut log, &mut surface);
        assert!(rec.is_empty());
        assert!(log.events.is_empty());
    }

    #[test]
    fn clear_exits_every_handle_once() {
        let data: Vec<u32> = (0..10).collect();
        let mut rec = RowReconciler::new();
        let mut log = Log::default();
        let mut surface = NullSurface::default();

        rec.reconcile(&window(0, 5), &data, &mut log, &mut surface);
        log.events.clear();
        rec.clear(&mut log);
        assert_eq!(log.events.len(), 1);
        assert_eq!(sorted(log.events[0].1.clone()), vec![0, 1, 2, 3, 4]);
        rec.clear(&mut log);
        assert_eq!(log.events.len(), 1, "second clear is a no-op");
    }

    #[test]
    fn update_refreshes_stored_rows() {
        // Same key, different payload: the handle must hand back the
        // refreshed row on exit, not the original.
        #[derive(Clone, PartialEq, Debug)]
        struct Row {
            id: u32,
            label: &'static str,
        }
        struct ById {
            exited: Vec<Row>,
        }
        impl RowPresenter<Row> for ById {
            type Key = u32;
            fn key(&self, row: &Row) -> u32 {
                row.id
            }
            fn enter(&mut self, _rows: &[Row]) {}
            fn update(&mut self, _rows: &[Row]) {}
            fn exit(&mut self, rows: &[Row]) {
                self.exited.extend_from_slice(rows);
            }
        }

        let mut rec = RowReconciler::new();
        let mut presenter = ById { exited: Vec::new() };
        let mut surface = NullSurface::default();

        let v1 = vec![Row { id: 7, label: "a" }];
        rec.reconcile(&window(0, 1), &v1, &mut presenter, &mut surface);
        let v2 = vec![Row { id: 7, label: "b" }];
        rec.reconcile(&window(0, 1), &v2, &mut presenter, &mut surface);
        rec.reconcile(&window(0, 0), &[], &mut presenter, &mut surface);

        assert_eq!(presenter.exited, vec![Row { id: 7, label: "b" }]);
    }
}
