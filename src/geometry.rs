//! Page-boundary geometry reported by whatever renders the document strip.
//!
//! The strip lays pages out left to right. For a document with N pages there are N+1 boundaries:
//! one before the first page, one between each pair of adjacent pages and one after the last.
//! A renderer attaches boundaries incrementally, so a provider only reports what is attached so
//! far and the caller decides whether that is enough.

/// Source of boundary pixel offsets for a rendered document strip.
pub trait GeometryProvider {
    /// Pixel offsets of the boundaries attached so far, left to right.
    fn boundary_positions(&self) -> Vec<f64>;
}

/// Boundaries for equally sized page cells separated by a fixed gap.
///
/// The boundary sits at the start of the gap before each page, so boundary `i` lies at
/// `origin + i * (page_width + gap)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformStrip {
    /// Number of pages laid out.
    pub page_count: usize,
    /// Width of one page cell.
    pub page_width: f64,
    /// Width of the gap holding a boundary.
    pub gap: f64,
    /// Offset of the first boundary.
    pub origin: f64,
}

impl UniformStrip {
    #[must_use]
    /// Lay out `page_count` cells of `page_width` with a unit gap from the origin.
    pub fn new(page_count: usize, page_width: f64) -> Self {
        Self {
            page_count,
            page_width,
            gap: 1.0,
            origin: 0.0,
        }
    }

    #[must_use]
    /// Distance between consecutive boundaries.
    pub fn pitch(&self) -> f64 {
        self.page_width + self.gap
    }

    #[must_use]
    /// Total width of the strip including the trailing boundary.
    pub fn width(&self) -> f64 {
        self.position(self.page_count) + self.gap
    }

    #[allow(clippy::cast_precision_loss)]
    fn position(&self, boundary: usize) -> f64 {
        self.origin + boundary as f64 * self.pitch()
    }
}

impl GeometryProvider for UniformStrip {
    fn boundary_positions(&self) -> Vec<f64> {
        (0..=self.page_count).map(|i| self.position(i)).collect()
    }
}

/// Boundaries measured elsewhere and handed over as-is.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StaticGeometry(pub Vec<f64>);

impl GeometryProvider for StaticGeometry {
    fn boundary_positions(&self) -> Vec<f64> {
        self.0.clone()
    }
}

/// Placement of the scrollable strip on screen, used to turn pointer coordinates into strip
/// content coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Screen x of the strip container's left edge.
    pub origin_x: f64,
    /// Current horizontal scroll offset of the strip content.
    pub scroll_x: f64,
    /// First screen row of the drop track.
    pub track_top: f64,
    /// Last screen row of the drop track (inclusive).
    pub track_bottom: f64,
}

impl Viewport {
    #[must_use]
    /// Convert a screen x coordinate to an offset within the strip content.
    pub fn to_content_x(&self, screen_x: f64) -> f64 {
        screen_x - self.origin_x + self.scroll_x
    }

    #[must_use]
    /// Convert a strip content offset back to a screen x coordinate.
    pub fn to_screen_x(&self, content_x: f64) -> f64 {
        content_x - self.scroll_x + self.origin_x
    }

    #[must_use]
    /// Whether a screen row lies within the drop track.
    pub fn in_track(&self, screen_y: f64) -> bool {
        screen_y >= self.track_top && screen_y <= self.track_bottom
    }
}

#[cfg(test)]
#[path = "tests/geometry.rs"]
mod tests;
