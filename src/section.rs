//! Named page ranges derived from marker positions.
//!
//! Sections are never edited directly. Every change to the markers throws the old list away and
//! derives a new one: each pair of adjacent boundaries becomes one inclusive page range, named
//! after the proposal that starts on the same page.

use crate::marker::MarkerSet;
use crate::proposal::Proposal;
use crate::snap_index::SnapIndex;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Tokens made only of digits, optionally hyphen-joined (`12`, `3-4`, `1-2-3`).
static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(-\d+)*$").expect("NUMERIC_TOKEN is a valid regex pattern"));

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// Contiguous inclusive page range with a display name.
pub struct Section {
    /// First page of the range (1-based).
    pub start_page: usize,
    /// Last page of the range (inclusive).
    pub end_page: usize,
    /// Display name shown to the user and used for the output file.
    pub name: String,
}

impl Section {
    #[must_use]
    /// Number of pages covered.
    pub fn page_len(&self) -> usize {
        self.end_page + 1 - self.start_page
    }
}

/// Derive the sections bounded by the current markers.
///
/// Markers are resolved to snap indices and sorted; every adjacent pair `(a, b)` with `b > a`
/// yields pages `a + 1 ..= b`. A marker whose position is not a snap position is skipped with a
/// warning rather than failing the derivation. Names come from the proposal starting on the same
/// page, cleaned by [`display_name`], with `Section {n}` as the fallback.
#[must_use]
pub fn derive_sections(
    markers: &MarkerSet,
    snaps: &SnapIndex,
    proposals: &[Proposal],
) -> Vec<Section> {
    let mut indices: Vec<usize> = markers
        .markers()
        .iter()
        .filter_map(|marker| {
            let index = snaps.index_of(marker.position);
            if index.is_none() {
                warn!(
                    position = marker.position,
                    "marker does not resolve to a snap position"
                );
            }
            index
        })
        .collect();
    indices.sort_unstable();

    let mut sections = Vec::with_capacity(indices.len().saturating_sub(1));
    for pair in indices.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if b <= a {
            continue;
        }
        let start_page = SnapIndex::page_at(a);
        let end_page = SnapIndex::page_at(b - 1);
        let ordinal = sections.len() + 1;
        let name = proposals
            .iter()
            .find(|p| p.start_page == start_page)
            .and_then(|p| display_name(&p.name))
            .unwrap_or_else(|| format!("Section {ordinal}"));
        sections.push(Section {
            start_page,
            end_page,
            name,
        });
    }
    debug!(sections = sections.len(), "derived sections");
    sections
}

#[must_use]
/// Shorten a proposal name to its last meaningful word.
///
/// Path separators and underscores become spaces, purely numeric tokens (including
/// hyphen-joined ranges) are dropped and the last remaining token is kept. Returns `None` when
/// nothing is left.
pub fn display_name(raw: &str) -> Option<String> {
    let spaced = raw.replace(['_', '\\', '/'], " ");
    spaced
        .split_whitespace()
        .rev()
        .find(|token| !NUMERIC_TOKEN.is_match(token))
        .map(str::to_string)
}

#[cfg(test)]
#[path = "tests/section.rs"]
mod tests;
