#![forbid(unsafe_code)]

//! Test harness and deterministic doubles for rowview.
//!
//! Everything here is replay-exact: the fake surface lays out after a fixed
//! number of measurement polls, the recording presenter logs callbacks in
//! arrival order, and the tick driver pumps with a bounded budget so a
//! renderer that never settles fails a test instead of hanging it. No
//! clocks, no randomness.
//!
//! The doubles live in a crate of their own (rather than per-test modules)
//! so integration tests across the workspace drive the renderer through one
//! shared, known-good implementation of the seams.

pub mod driver;
pub mod presenter;
pub mod surface;

pub use driver::TickDriver;
pub use presenter::{PresenterEvent, RecordingPresenter, Row, rows};
pub use surface::FakeSurface;
