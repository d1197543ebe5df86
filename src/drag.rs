//! Resolving a drop gesture to a snap position and applying it to the marker set.
//!
//! Resolution is checked before anything is touched: a gesture that fails any rule leaves the
//! marker set exactly as it was, which is the whole of the cancellation contract.

use crate::error::{SplitError, SplitResult};
use crate::geometry::Viewport;
use crate::marker::MarkerSet;
use crate::snap_index::SnapIndex;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
/// A completed drag of one marker.
pub struct DragGesture {
    /// Index of the dragged marker in the marker set.
    pub marker: usize,
    /// Drop position in strip content coordinates.
    pub drop_x: f64,
    /// Whether the marker was released over the drop track.
    pub inside_track: bool,
}

impl DragGesture {
    #[must_use]
    /// Gesture released inside the track at content offset `drop_x`.
    pub fn new(marker: usize, drop_x: f64) -> Self {
        Self {
            marker,
            drop_x,
            inside_track: true,
        }
    }

    #[must_use]
    /// Gesture from a raw screen release point.
    pub fn from_screen(marker: usize, screen_x: f64, screen_y: f64, viewport: &Viewport) -> Self {
        Self {
            marker,
            drop_x: viewport.to_content_x(screen_x),
            inside_track: viewport.in_track(screen_y),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Where a valid gesture lands.
pub struct DropTarget {
    /// Snap index of the landing boundary.
    pub index: usize,
    /// Pixel position of the landing boundary.
    pub position: f64,
}

/// Work out where `gesture` would land without touching the marker set.
///
/// # Errors
///
/// - [`SplitError::UnknownMarker`] if the gesture names no marker.
/// - [`SplitError::InvalidTargetSnap`] if there are no snap positions to land on or the drop
///   position is not finite.
/// - [`SplitError::BoundaryViolation`] if the leftmost marker is dropped at or left of its own
///   boundary, or the rightmost at or right of its own.
/// - [`SplitError::OutOfTrack`] if the marker was released off the track.
/// - [`SplitError::UnresolvableMarkerPosition`] if the dragged marker is not on a snap position.
pub fn resolve_drag(
    markers: &MarkerSet,
    snaps: &SnapIndex,
    gesture: &DragGesture,
) -> SplitResult<DropTarget> {
    let marker = markers
        .get(gesture.marker)
        .ok_or(SplitError::UnknownMarker(gesture.marker))?;
    let index = snaps
        .nearest(gesture.drop_x)
        .ok_or(SplitError::InvalidTargetSnap)?;
    let position = snaps.position(index).ok_or(SplitError::InvalidTargetSnap)?;

    let current = snaps
        .index_of(marker.position)
        .ok_or(SplitError::UnresolvableMarkerPosition(marker.position))?;
    let violation = (markers.is_leftmost(gesture.marker) && index <= current)
        || (markers.is_rightmost(gesture.marker) && index >= current);
    if violation {
        return Err(SplitError::BoundaryViolation {
            marker: gesture.marker,
            target: index,
        });
    }

    if !gesture.inside_track {
        return Err(SplitError::OutOfTrack);
    }

    Ok(DropTarget { index, position })
}

/// Move the dragged marker onto `target`: sweep, relocate, dedup.
///
/// `target` must come from [`resolve_drag`] for the same set and gesture.
pub fn apply_drag(markers: &mut MarkerSet, marker: usize, target: DropTarget) {
    let Some(from) = markers.get(marker).map(|m| m.position) else {
        return;
    };
    let dragged = markers.remove_crossed(marker, from, target.position);
    markers.relocate(dragged, target.position);
    markers.dedup();
    debug!(
        from,
        to = target.position,
        snap = target.index,
        markers = markers.len(),
        "applied drag"
    );
}

/// Resolve and apply a gesture in one step.
///
/// # Errors
///
/// Any error from [`resolve_drag`]; the marker set is untouched in that case.
pub fn drag(
    markers: &mut MarkerSet,
    snaps: &SnapIndex,
    gesture: &DragGesture,
) -> SplitResult<DropTarget> {
    let target = resolve_drag(markers, snaps, gesture)?;
    apply_drag(markers, gesture.marker, target);
    Ok(target)
}

#[cfg(test)]
#[path = "tests/drag.rs"]
mod tests;
