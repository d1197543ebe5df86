//! Snap positions derived from page-boundary geometry.
//!
//! Index `i` denotes the boundary immediately before page `i + 1`, so index 0 is the document
//! start and index N the document end. Markers may only ever rest on one of these positions.

use crate::error::{SplitError, SplitResult};
use crate::geometry::GeometryProvider;
use std::cmp::Ordering;

/// Ordered pixel positions of the N+1 page boundaries of a document.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapIndex {
    positions: Vec<f64>,
}

impl SnapIndex {
    /// Build the index for a document of `page_count` pages from attached geometry.
    ///
    /// Construction is all or nothing: partial geometry is reported back as
    /// [`SplitError::GeometryNotReady`] so the caller can defer until the renderer has attached
    /// every boundary.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is empty, if the provider reports fewer or more than
    /// `page_count + 1` positions, or if a position does not lie strictly right of its
    /// predecessor. Coincident boundaries would make two snap indices share one position.
    pub fn build(page_count: usize, provider: &dyn GeometryProvider) -> SplitResult<Self> {
        if page_count == 0 {
            return Err(SplitError::EmptyDocument);
        }
        let positions = provider.boundary_positions();
        let expected = page_count + 1;
        let reported = positions.len();
        if reported < expected {
            return Err(SplitError::GeometryNotReady { expected, reported });
        }
        if reported > expected {
            return Err(SplitError::GeometryMismatch { expected, reported });
        }
        if let Some(index) = positions
            .windows(2)
            .position(|pair| pair[1].partial_cmp(&pair[0]) != Some(Ordering::Greater))
        {
            return Err(SplitError::UnorderedGeometry {
                index: index + 1,
                position: positions[index + 1],
            });
        }
        Ok(Self { positions })
    }

    #[must_use]
    /// Number of boundaries (page count plus one).
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    /// Whether there are no boundaries.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[must_use]
    /// Number of pages the index covers.
    pub fn page_count(&self) -> usize {
        self.positions.len().saturating_sub(1)
    }

    #[must_use]
    /// All positions, left to right.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    #[must_use]
    /// Position of boundary `index`.
    pub fn position(&self, index: usize) -> Option<f64> {
        self.positions.get(index).copied()
    }

    #[must_use]
    /// Position of the document start boundary.
    pub fn start(&self) -> f64 {
        self.positions.first().copied().unwrap_or_default()
    }

    #[must_use]
    /// Position of the document end boundary.
    pub fn end(&self) -> f64 {
        self.positions.last().copied().unwrap_or_default()
    }

    #[must_use]
    /// 1-based page number that begins at boundary `index`.
    pub fn page_at(index: usize) -> usize {
        index + 1
    }

    #[must_use]
    #[allow(clippy::float_cmp)]
    /// Boundary index whose position is exactly `position`.
    ///
    /// Markers are only ever placed by copying a snap position, so exact comparison is the
    /// membership test. Coincident positions resolve to the lowest index.
    pub fn index_of(&self, position: f64) -> Option<usize> {
        self.positions.iter().position(|&p| p == position)
    }

    #[must_use]
    /// Boundary index closest to `x`; ties go to the lowest index.
    ///
    /// A non-finite `x` has no nearest boundary.
    pub fn nearest(&self, x: f64) -> Option<usize> {
        if !x.is_finite() {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        for (i, &p) in self.positions.iter().enumerate() {
            let diff = (x - p).abs();
            if best.is_none_or(|(_, min)| diff < min) {
                best = Some((i, diff));
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
#[path = "tests/snap_index.rs"]
mod tests;
