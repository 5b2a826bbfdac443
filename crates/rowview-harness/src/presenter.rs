#![forbid(unsafe_code)]

//! Recording presenter and fixture rows.

use rowview::RowPresenter;
use std::collections::BTreeSet;

/// A fixture row: stable id plus a payload that can change across renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Stable identity.
    pub id: u64,
    /// Data-dependent payload.
    pub label: String,
}

impl Row {
    /// Create a row with a derived label.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            label: format!("row {id}"),
        }
    }
}

/// Build `n` fixture rows with ids `0..n`.
#[must_use]
pub fn rows(n: u64) -> Vec<Row> {
    (0..n).map(Row::new).collect()
}

/// One recorded presenter callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    /// Rows entered, by id, in window order.
    Enter(Vec<u64>),
    /// Rows updated, by id, in window order.
    Update(Vec<u64>),
    /// Rows exited, by id, sorted (exit order is unspecified).
    Exit(Vec<u64>),
    /// The renderer asked for more data.
    LoadMore,
}

/// A [`RowPresenter`] that records every callback and tracks the live set.
///
/// The live set mirrors what a real presenter would have materialized; the
/// no-duplicates/no-leaks invariant checks compare it against the expected
/// window slice.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    /// All callbacks, in arrival order.
    pub events: Vec<PresenterEvent>,
    /// Ids currently materialized (entered and not yet exited).
    pub live: BTreeSet<u64>,
    /// Number of load-more requests observed.
    pub load_more_count: u32,
    /// Value returned by `is_read_mode`.
    pub read_mode: bool,
}

impl RecordingPresenter {
    /// A presenter in read mode with nothing recorded.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            live: BTreeSet::new(),
            load_more_count: 0,
            read_mode: true,
        }
    }

    /// Ids currently live, ascending.
    #[must_use]
    pub fn live_ids(&self) -> Vec<u64> {
        self.live.iter().copied().collect()
    }

    /// Drop recorded events (the live set is kept).
    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl RowPresenter<Row> for RecordingPresenter {
    type Key = u64;

    fn key(&self, row: &Row) -> u64 {
        row.id
    }

    fn enter(&mut self, rows: &[Row]) {
        let ids: Vec<u64> = rows.iter().map(|r| r.id).collect();
        for id in &ids {
            self.live.insert(*id);
        }
        self.events.push(PresenterEvent::Enter(ids));
    }

    fn update(&mut self, rows: &[Row]) {
        self.events
            .push(PresenterEvent::Update(rows.iter().map(|r| r.id).collect()));
    }

    fn exit(&mut self, rows: &[Row]) {
        let mut ids: Vec<u64> = rows.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        for id in &ids {
            self.live.remove(id);
        }
        self.events.push(PresenterEvent::Exit(ids));
    }

    fn load_more(&mut self) {
        self.load_more_count += 1;
        self.events.push(PresenterEvent::LoadMore);
    }

    fn is_read_mode(&self) -> bool {
        self.read_mode
    }
}
