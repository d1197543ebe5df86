//! Error types for split review operations.
//!
//! Every variant here is recoverable. The core returns them as values and the session turns
//! them into a deferral, a rejected gesture or a fallback label; none of them end a session.

use std::io;

/// Errors that can occur while building snap positions or moving markers.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    /// The document has no pages, so there is nothing to split.
    #[error("document has no pages")]
    EmptyDocument,

    /// Fewer boundary positions are attached than the page count requires.
    #[error("geometry not ready: expected {expected} boundary positions, {reported} reported")]
    GeometryNotReady {
        /// Boundary count required (page count plus one).
        expected: usize,
        /// Boundary count the provider reported.
        reported: usize,
    },

    /// More boundary positions were reported than the page count allows.
    #[error("geometry mismatch: expected {expected} boundary positions, {reported} reported")]
    GeometryMismatch {
        /// Boundary count required (page count plus one).
        expected: usize,
        /// Boundary count the provider reported.
        reported: usize,
    },

    /// A boundary position does not lie strictly right of its predecessor.
    #[error("boundary {index} at {position} is not right of the previous boundary")]
    UnorderedGeometry {
        /// Index of the offending boundary.
        index: usize,
        /// Its reported pixel offset.
        position: f64,
    },

    /// The nearest-snap search had no candidates.
    #[error("no snap position available for the drop")]
    InvalidTargetSnap,

    /// An end cap was dropped onto or beyond its own boundary.
    #[error("marker {marker} cannot move to snap index {target}")]
    BoundaryViolation {
        /// Index of the dragged marker in the marker set.
        marker: usize,
        /// Snap index the drop resolved to.
        target: usize,
    },

    /// The marker was released outside the drop track.
    #[error("marker released outside the drop track")]
    OutOfTrack,

    /// The gesture names a marker that does not exist.
    #[error("no marker at index {0}")]
    UnknownMarker(usize),

    /// A drag is already in progress.
    #[error("a drag is already in progress")]
    DragInProgress,

    /// The session has no markers to drag yet.
    #[error("session is not ready for interaction")]
    NotInteractive,

    /// A marker rests at a position that is not a snap position.
    #[error("marker position {0} does not match any snap position")]
    UnresolvableMarkerPosition(f64),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A JSON document could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for split review operations.
pub type SplitResult<T> = Result<T, SplitError>;
