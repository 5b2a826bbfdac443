#![forbid(unsafe_code)]

//! Bounded tick pump.

use rowview::{Renderer, RowPresenter, ScrollSurface};

/// Default tick budget; generous for any settling sequence the renderer can
/// legitimately need (a schedule plus a multi-tick measurement).
pub const DEFAULT_TICK_BUDGET: usize = 64;

/// Pumps a renderer until it reports quiescence, within a budget.
///
/// The budget turns a renderer that never settles (a surface that never
/// lays out, a scheduling bug) into a test failure instead of an infinite
/// loop: [`pump`](Self::pump) returns the ticks spent, and spending the
/// whole budget while [`Renderer::needs_tick`] still holds is for the test
/// to assert on via [`Renderer::phase`].
#[derive(Debug, Clone, Copy)]
pub struct TickDriver {
    budget: usize,
}

impl Default for TickDriver {
    fn default() -> Self {
        Self {
            budget: DEFAULT_TICK_BUDGET,
        }
    }
}

impl TickDriver {
    /// A driver with the default budget.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver with a custom budget.
    #[must_use]
    pub fn with_budget(budget: usize) -> Self {
        Self { budget }
    }

    /// Tick until the renderer is quiescent or the budget runs out.
    /// Returns the number of ticks spent.
    pub fn pump<T, P, S>(&self, renderer: &mut Renderer<T, P, S>) -> usize
    where
        T: Clone,
        P: RowPresenter<T>,
        S: ScrollSurface,
    {
        let mut spent = 0;
        while spent < self.budget && renderer.needs_tick() {
            renderer.tick();
            spent += 1;
        }
        spent
    }
}
