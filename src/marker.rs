//! Boundary markers and the ordered set that holds them.
//!
//! A marker set always carries two locked end caps, one on the first snap position and one on
//! the last. Everything in between is an unlocked, user-adjustable split. The set is kept sorted
//! by position between mutations; a drag runs three passes over it, each of which can be
//! exercised on its own:
//!
//! 1. [`MarkerSet::remove_crossed`] sweeps away unlocked markers the drag passes over.
//! 2. [`MarkerSet::relocate`] moves the dragged marker, or for an end cap, leaves a locked copy
//!    behind and moves an unlocked one.
//! 3. [`MarkerSet::dedup`] collapses unlocked markers that landed within the overlap tolerance
//!    of a marker already kept, then restores position order.

use crate::snap_index::SnapIndex;
use tracing::{debug, warn};

/// Pixel distance at or below which two markers count as the same boundary.
pub const DEFAULT_OVERLAP_TOLERANCE: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq)]
/// A draggable boundary resting on a snap position.
pub struct Marker {
    /// Pixel offset; always one of the snap positions.
    pub position: f64,
    /// End caps are locked and are never removed.
    pub locked: bool,
}

impl Marker {
    #[must_use]
    /// Immovable end cap at `position`.
    pub fn locked(position: f64) -> Self {
        Self {
            position,
            locked: true,
        }
    }

    #[must_use]
    /// User-adjustable split at `position`.
    pub fn unlocked(position: f64) -> Self {
        Self {
            position,
            locked: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Ordered collection of boundary markers for one editing session.
pub struct MarkerSet {
    markers: Vec<Marker>,
    tolerance: f64,
}

impl MarkerSet {
    #[must_use]
    /// Seed markers from the start pages of proposed sections.
    ///
    /// The set gets a locked cap at each end and an unlocked marker at `snaps[start - 1]` for
    /// every interior start page (`1 < start <= page_count`). Proposals that land on a position
    /// already taken are skipped.
    pub fn seed<I>(snaps: &SnapIndex, start_pages: I, tolerance: f64) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let last = snaps.page_count();
        let mut markers = vec![Marker::locked(snaps.start())];
        for start in start_pages {
            if start <= 1 || start > last {
                continue;
            }
            let Some(position) = snaps.position(start - 1) else {
                continue;
            };
            if markers.iter().any(|m| same_position(m.position, position)) {
                debug!(start, "skipping duplicate proposed boundary");
                continue;
            }
            markers.push(Marker::unlocked(position));
        }
        markers.push(Marker::locked(snaps.end()));

        let mut set = Self { markers, tolerance };
        set.sort();
        debug!(markers = set.len(), "seeded marker set");
        set
    }

    #[must_use]
    /// Markers in position order.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    /// Marker at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    #[must_use]
    /// Number of markers including both end caps.
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    #[must_use]
    /// True only for a set that was never seeded.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    #[must_use]
    /// Overlap tolerance used by the dedup pass.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    /// Number of locked end caps.
    pub fn locked_count(&self) -> usize {
        self.markers.iter().filter(|m| m.locked).count()
    }

    #[must_use]
    /// Whether no other marker sits left of marker `index`.
    pub fn is_leftmost(&self, index: usize) -> bool {
        self.markers
            .get(index)
            .is_some_and(|m| self.markers.iter().all(|o| o.position >= m.position))
    }

    #[must_use]
    /// Whether no other marker sits right of marker `index`.
    pub fn is_rightmost(&self, index: usize) -> bool {
        self.markers
            .get(index)
            .is_some_and(|m| self.markers.iter().all(|o| o.position <= m.position))
    }

    #[must_use]
    /// Index of the marker closest to `x`.
    pub fn nearest(&self, x: f64) -> Option<usize> {
        self.markers
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (a.position - x).abs().total_cmp(&(b.position - x).abs()))
            .map(|(i, _)| i)
    }

    #[allow(clippy::float_cmp)]
    /// Delete every unlocked marker the drag from `from` to `to` passes over.
    ///
    /// Markers strictly between the two positions go, as does an unlocked marker sitting exactly
    /// on `to`. Locked markers and the dragged marker itself always stay. Returns the dragged
    /// marker's index after removal.
    pub fn remove_crossed(&mut self, dragged: usize, from: f64, to: f64) -> usize {
        let (low, high) = if from <= to { (from, to) } else { (to, from) };
        let mut kept = Vec::with_capacity(self.markers.len());
        let mut dragged_at = dragged;
        for (i, marker) in self.markers.iter().enumerate() {
            if i == dragged {
                dragged_at = kept.len();
                kept.push(*marker);
                continue;
            }
            let crossed = marker.position > low && marker.position < high;
            let superseded = marker.position == to;
            if marker.locked || !(crossed || superseded) {
                kept.push(*marker);
            }
        }
        let removed = self.markers.len() - kept.len();
        if removed > 0 {
            debug!(removed, "drag swept over markers");
        }
        self.markers = kept;
        dragged_at
    }

    /// Put the dragged marker on `to`.
    ///
    /// An unlocked marker simply moves. A locked marker is a structural endpoint, so a fresh
    /// locked copy is left on its original position and the dragged instance becomes an
    /// unlocked marker at `to`.
    pub fn relocate(&mut self, dragged: usize, to: f64) {
        let Some(marker) = self.markers.get_mut(dragged) else {
            return;
        };
        if marker.locked {
            let original = marker.position;
            *marker = Marker::unlocked(to);
            self.markers.insert(dragged, Marker::locked(original));
        } else {
            marker.position = to;
        }
    }

    /// Collapse overlapping unlocked markers and restore position order.
    ///
    /// Locked markers are all kept and claim their positions first. Unlocked markers are then
    /// taken in set order; one within the tolerance of anything already kept is discarded.
    pub fn dedup(&mut self) {
        let (locked, unlocked): (Vec<Marker>, Vec<Marker>) =
            self.markers.iter().partition(|m| m.locked);
        let mut seen: Vec<f64> = locked.iter().map(|m| m.position).collect();
        let mut kept = locked;
        for marker in unlocked {
            if seen
                .iter()
                .any(|&s| (s - marker.position).abs() <= self.tolerance)
            {
                continue;
            }
            seen.push(marker.position);
            kept.push(marker);
        }
        self.markers = kept;
        self.sort();
    }

    /// Replace all unlocked markers with ones at the given start pages.
    ///
    /// Used when section boundaries are edited numerically rather than dragged. End caps are
    /// recreated on the first and last snap positions.
    pub fn rebuild_from_starts<I>(&mut self, snaps: &SnapIndex, start_pages: I)
    where
        I: IntoIterator<Item = usize>,
    {
        *self = Self::seed(snaps, start_pages, self.tolerance);
    }

    /// Move every marker onto the matching boundary of a recomputed snap index.
    ///
    /// Both indices must cover the same page count. A marker whose position is not a boundary
    /// of `old` cannot be carried over and is dropped with a warning. Returns the number of
    /// markers dropped.
    pub fn remap(&mut self, old: &SnapIndex, new: &SnapIndex) -> usize {
        let before = self.markers.len();
        self.markers.retain_mut(|marker| {
            let Some(position) = old.index_of(marker.position).and_then(|i| new.position(i))
            else {
                warn!(position = marker.position, "marker lost its snap position on relayout");
                return false;
            };
            marker.position = position;
            true
        });
        self.dedup();
        before - self.markers.len()
    }

    fn sort(&mut self) {
        self.markers.sort_by(|a, b| a.position.total_cmp(&b.position));
    }
}

#[allow(clippy::float_cmp)]
fn same_position(a: f64, b: f64) -> bool {
    a == b
}

#[cfg(test)]
#[path = "tests/marker.rs"]
mod tests;
