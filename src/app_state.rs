//! The session state machine bridging geometry, proposals and marker edits.
//!
//! A review session needs a single source of truth that the host can interrogate and mutate one
//! event at a time. Geometry and proposals arrive independently and in either order; the session
//! only seeds markers once it has both, and only accepts drags once it has markers. Sections are
//! re-derived after every change and never patched.
//!
//! ```text
//! Uninitialized --geometry--> GeometryReady --proposals--> Seeded --first edit--> Interactive
//!        |                                                   ^
//!        +------------proposals (held until geometry)--------+
//! ```
//!
//! Drags are serialised: while one is in progress a second cannot begin and incoming proposals
//! are held back until it ends.

use crate::commit_plan::CommitPlan;
use crate::drag::{self, DragGesture, DropTarget};
use crate::error::{SplitError, SplitResult};
use crate::geometry::GeometryProvider;
use crate::marker::MarkerSet;
use crate::proposal::{Proposal, ProposalStore};
use crate::section::{derive_sections, Section};
use crate::snap_index::SnapIndex;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Lifecycle stage of a review session.
pub enum Phase {
    /// Neither geometry nor markers are available yet.
    Uninitialized,
    /// Snap positions are known; waiting for proposals to seed markers.
    GeometryReady,
    /// Markers are seeded from proposals and untouched by the user.
    ///
    /// New proposals arriving in this phase replace the seeded markers.
    Seeded,
    /// The user has edited the markers.
    ///
    /// New proposals arriving in this phase only refresh section names so that edits are kept.
    Interactive,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// A drag that has started but not yet been dropped.
pub struct ActiveDrag {
    /// Index of the marker being dragged.
    pub marker: usize,
    /// Position the marker had when the drag began.
    pub origin: f64,
    /// Current pointer position in strip content coordinates.
    pub cursor: f64,
    /// Whether the pointer is over the drop track.
    pub inside_track: bool,
}

#[derive(Debug)]
/// What became of a drop.
pub enum DragOutcome {
    /// The marker set changed; the marker landed on this boundary.
    Applied(DropTarget),
    /// Nothing changed; the host should snap the marker back.
    Rejected(SplitError),
}

impl DragOutcome {
    #[must_use]
    /// Whether the drop mutated the marker set.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Review session state shared between the host UI and the core.
pub struct AppState {
    phase: Phase,
    tolerance: f64,
    snaps: Option<SnapIndex>,
    markers: Option<MarkerSet>,
    proposals: Option<ProposalStore>,
    pending_proposals: Option<ProposalStore>,
    sections: Vec<Section>,
    drag: Option<ActiveDrag>,
    active_indicator: Option<usize>,
    /// Marker the keyboard cursor is on.
    pub selected_marker: usize,
    /// Section highlighted in the section list.
    pub selected_section: usize,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
}

impl AppState {
    #[must_use]
    /// Empty session merging markers closer than `tolerance`.
    pub fn new(tolerance: f64) -> Self {
        Self {
            phase: Phase::Uninitialized,
            tolerance,
            snaps: None,
            markers: None,
            proposals: None,
            pending_proposals: None,
            sections: Vec::new(),
            drag: None,
            active_indicator: None,
            selected_marker: 0,
            selected_section: 0,
            message: None,
        }
    }

    #[must_use]
    /// Current lifecycle stage.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    /// Snap positions, once geometry is loaded.
    pub fn snaps(&self) -> Option<&SnapIndex> {
        self.snaps.as_ref()
    }

    #[must_use]
    /// Markers, once seeded.
    pub fn markers(&self) -> Option<&MarkerSet> {
        self.markers.as_ref()
    }

    #[must_use]
    /// Sections derived from the current markers.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    /// The drag in progress, if any.
    pub fn drag(&self) -> Option<&ActiveDrag> {
        self.drag.as_ref()
    }

    #[must_use]
    /// Snap index highlighted by the last successful drop.
    pub fn active_indicator(&self) -> Option<usize> {
        self.active_indicator
    }

    #[must_use]
    /// Proposals currently used for naming.
    pub fn proposals(&self) -> &[Proposal] {
        self.proposals
            .as_ref()
            .map_or(&[][..], ProposalStore::proposals)
    }

    /// Take the renderer's boundary geometry for a document of `page_count` pages.
    ///
    /// A relayout of the same document carries the markers over to the new positions. A
    /// different page count means a different document: markers are discarded and re-seeded
    /// from the stored proposals. Any drag in progress is cancelled.
    ///
    /// # Errors
    ///
    /// Returns the [`SnapIndex::build`] error and leaves the session unchanged; for
    /// [`SplitError::GeometryNotReady`] the host should retry once more boundaries are attached.
    pub fn load_geometry(
        &mut self,
        page_count: usize,
        provider: &dyn GeometryProvider,
    ) -> SplitResult<()> {
        let snaps = match SnapIndex::build(page_count, provider) {
            Ok(snaps) => snaps,
            Err(e) => {
                debug!(error = %e, "deferring snap index construction");
                return Err(e);
            }
        };
        if self.drag.take().is_some() {
            debug!("relayout cancelled drag in progress");
        }

        let relayout = self
            .snaps
            .as_ref()
            .is_some_and(|old| old.page_count() == snaps.page_count());
        if relayout {
            if let (Some(old), Some(markers)) = (self.snaps.as_ref(), self.markers.as_mut()) {
                let dropped = markers.remap(old, &snaps);
                if dropped > 0 {
                    warn!(dropped, "markers dropped on relayout");
                }
            }
            self.snaps = Some(snaps);
            self.active_indicator = None;
            self.rederive();
            debug!("snap index recomputed for relayout");
        } else {
            info!(pages = page_count, "geometry ready");
            self.snaps = Some(snaps);
            self.markers = None;
            self.sections.clear();
            self.active_indicator = None;
            self.phase = Phase::GeometryReady;
            if self.proposals.is_some() {
                self.seed();
            }
        }
        self.apply_pending();
        Ok(())
    }

    /// Take proposals from the analysis service.
    ///
    /// Held back while a drag is in progress and applied when it ends.
    pub fn receive_proposals(&mut self, store: ProposalStore) {
        if self.drag.is_some() {
            debug!("holding proposals until the drag ends");
            self.pending_proposals = Some(store);
            return;
        }
        self.proposals = Some(store);
        match self.phase {
            Phase::Uninitialized => debug!("holding proposals until geometry is ready"),
            Phase::GeometryReady | Phase::Seeded => self.seed(),
            Phase::Interactive => {
                debug!("refreshing section names from new proposals");
                self.rederive();
            }
        }
    }

    /// Pick up marker `marker`.
    ///
    /// # Errors
    ///
    /// Returns [`SplitError::DragInProgress`] if another drag has not ended,
    /// [`SplitError::NotInteractive`] before markers are seeded and
    /// [`SplitError::UnknownMarker`] for a marker that does not exist.
    pub fn begin_drag(&mut self, marker: usize) -> SplitResult<()> {
        if self.drag.is_some() {
            return Err(SplitError::DragInProgress);
        }
        let markers = self.markers.as_ref().ok_or(SplitError::NotInteractive)?;
        let origin = markers
            .get(marker)
            .ok_or(SplitError::UnknownMarker(marker))?
            .position;
        self.drag = Some(ActiveDrag {
            marker,
            origin,
            cursor: origin,
            inside_track: true,
        });
        self.selected_marker = marker;
        Ok(())
    }

    /// Move the pointer of the drag in progress to content offset `x`.
    pub fn move_drag(&mut self, x: f64, inside_track: bool) {
        if let Some(drag) = self.drag.as_mut() {
            drag.cursor = x;
            drag.inside_track = inside_track;
        }
    }

    /// Shift the pointer of the drag in progress by `dx`.
    pub fn nudge_drag(&mut self, dx: f64) {
        if let Some(drag) = self.drag.as_mut() {
            drag.cursor += dx;
        }
    }

    /// Lift the dragged marker off the track, or put it back.
    pub fn set_drag_in_track(&mut self, inside_track: bool) {
        if let Some(drag) = self.drag.as_mut() {
            drag.inside_track = inside_track;
        }
    }

    #[must_use]
    /// Snap index the drag in progress would land on.
    pub fn drag_preview(&self) -> Option<usize> {
        let drag = self.drag.as_ref()?;
        self.snaps.as_ref()?.nearest(drag.cursor)
    }

    /// Drop the marker being dragged where its pointer currently is.
    pub fn drop_at_cursor(&mut self) -> DragOutcome {
        let Some(active) = self.drag else {
            return DragOutcome::Rejected(SplitError::NotInteractive);
        };
        self.end_drag(DragGesture {
            marker: active.marker,
            drop_x: active.cursor,
            inside_track: active.inside_track,
        })
    }

    /// Finish the drag in progress with the host's observed drop.
    ///
    /// On success the marker set is mutated, the landing boundary becomes the active indicator
    /// and sections are re-derived. On rejection the session is exactly as it was before the
    /// drag began. A gesture naming a different marker than the one picked up is rejected with
    /// [`SplitError::UnknownMarker`] and ends the drag.
    pub fn end_drag(&mut self, gesture: DragGesture) -> DragOutcome {
        let Some(active) = self.drag.take() else {
            return DragOutcome::Rejected(SplitError::NotInteractive);
        };
        let outcome = if gesture.marker == active.marker {
            self.apply_gesture(&gesture)
        } else {
            warn!(
                picked_up = active.marker,
                dropped = gesture.marker,
                "drop names a marker that is not being dragged"
            );
            DragOutcome::Rejected(SplitError::UnknownMarker(gesture.marker))
        };
        self.apply_pending();
        outcome
    }

    /// Abandon the drag in progress without touching the markers.
    pub fn cancel_drag(&mut self) {
        if self.drag.take().is_some() {
            debug!("drag cancelled");
            self.apply_pending();
        }
    }

    fn apply_gesture(&mut self, gesture: &DragGesture) -> DragOutcome {
        let (Some(markers), Some(snaps)) = (self.markers.as_mut(), self.snaps.as_ref()) else {
            return DragOutcome::Rejected(SplitError::NotInteractive);
        };
        match drag::drag(markers, snaps, gesture) {
            Ok(target) => {
                self.selected_marker = markers
                    .nearest(target.position)
                    .unwrap_or(self.selected_marker);
                self.active_indicator = Some(target.index);
                self.phase = Phase::Interactive;
                self.rederive();
                DragOutcome::Applied(target)
            }
            Err(e) => {
                warn!(marker = gesture.marker, drop_x = gesture.drop_x, reason = %e, "drag rejected");
                DragOutcome::Rejected(e)
            }
        }
    }

    /// Move the start of section `index` to `page`, as when typing a page number.
    ///
    /// All unlocked markers are rebuilt from the section start pages. Returns false, changing
    /// nothing, during a drag, for an unknown section or for a page outside the document.
    pub fn set_section_start(&mut self, index: usize, page: usize) -> bool {
        if self.drag.is_some() || index >= self.sections.len() {
            return false;
        }
        let (Some(markers), Some(snaps)) = (self.markers.as_mut(), self.snaps.as_ref()) else {
            return false;
        };
        if page == 0 || page > snaps.page_count() {
            return false;
        }
        let starts: Vec<usize> = self
            .sections
            .iter()
            .enumerate()
            .map(|(i, s)| if i == index { page } else { s.start_page })
            .collect();
        markers.rebuild_from_starts(snaps, starts);
        self.phase = Phase::Interactive;
        self.active_indicator = None;
        self.rederive();
        true
    }

    #[must_use]
    /// Position of the boundary where section `index` starts, for scrolling it into view.
    pub fn section_anchor(&self, index: usize) -> Option<f64> {
        let section = self.sections.get(index)?;
        self.snaps.as_ref()?.position(section.start_page - 1)
    }

    #[must_use]
    /// Request to cut `original_file_path` along the current sections.
    pub fn commit_plan(&self, original_file_path: &str) -> CommitPlan {
        let old_paths = self
            .proposals
            .as_ref()
            .map_or(&[][..], ProposalStore::source_paths);
        CommitPlan::for_document(original_file_path, &self.sections, old_paths)
    }

    /// Move the marker cursor one marker left or right.
    pub fn select_marker(&mut self, forward: bool) {
        let count = self.markers.as_ref().map_or(0, MarkerSet::len);
        if count == 0 {
            return;
        }
        self.selected_marker = if forward {
            (self.selected_marker + 1).min(count - 1)
        } else {
            self.selected_marker.saturating_sub(1)
        };
    }

    /// Move the section highlight one section up or down.
    pub fn select_section(&mut self, forward: bool) {
        let count = self.sections.len();
        if count == 0 {
            return;
        }
        self.selected_section = if forward {
            (self.selected_section + 1).min(count - 1)
        } else {
            self.selected_section.saturating_sub(1)
        };
    }

    fn seed(&mut self) {
        let Some(snaps) = self.snaps.as_ref() else {
            return;
        };
        let starts: Vec<usize> = self
            .proposals
            .as_ref()
            .map(|p| p.start_pages().collect())
            .unwrap_or_default();
        self.markers = Some(MarkerSet::seed(snaps, starts, self.tolerance));
        self.phase = Phase::Seeded;
        self.active_indicator = None;
        self.selected_marker = 0;
        self.rederive();
        info!(sections = self.sections.len(), "markers seeded from proposals");
    }

    fn rederive(&mut self) {
        self.sections = match (self.markers.as_ref(), self.snaps.as_ref()) {
            (Some(markers), Some(snaps)) => derive_sections(markers, snaps, self.proposals()),
            _ => Vec::new(),
        };
        let marker_count = self.markers.as_ref().map_or(0, MarkerSet::len);
        self.selected_marker = self.selected_marker.min(marker_count.saturating_sub(1));
        self.selected_section = self
            .selected_section
            .min(self.sections.len().saturating_sub(1));
    }

    fn apply_pending(&mut self) {
        if let Some(store) = self.pending_proposals.take() {
            self.receive_proposals(store);
        }
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
