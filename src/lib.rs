//! splitreview: drag page-boundary markers over a document strip to review proposed splits.
//!
//! An analysis service proposes where a multi-page document should be split. The session seeds
//! one marker per proposed boundary between two locked end caps; the reviewer drags markers to
//! move, fuse or add splits, and the named page ranges are re-derived after every change.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod commit_plan;
pub mod config;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod marker;
pub mod proposal;
pub mod section;
pub mod snap_index;
pub mod ui;
