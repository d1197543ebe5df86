//! Configuration to acknowledge reviewer preferences as well as set defaults.
//!
//! Specifically, we try to find a splitreview.toml, and if present we load settings from there.
//! This provides the marker overlap tolerance, the width of a page cell in the strip and the
//! words to strip from proposed file names.

use crate::geometry::UniformStrip;
use crate::marker::DEFAULT_OVERLAP_TOLERANCE;
use facet::Facet;
use std::fs;
use std::path::Path;
use tracing::warn;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "splitreview.toml";

const DEFAULT_PAGE_WIDTH: u16 = 6;

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from splitreview.toml or falling back to defaults.
pub struct Config {
    #[facet(default = DEFAULT_OVERLAP_TOLERANCE)]
    /// Distance at or below which two markers are merged.
    pub overlap_tolerance: f64,
    #[facet(default = 6)]
    /// Terminal columns per page cell in the strip.
    pub page_width: u16,
    #[facet(default = vec!["doc".to_string()])]
    /// Words dropped when naming sections after proposed file paths.
    pub boilerplate_tokens: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overlap_tolerance: DEFAULT_OVERLAP_TOLERANCE,
            page_width: DEFAULT_PAGE_WIDTH,
            boilerplate_tokens: vec!["doc".to_string()],
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from splitreview.toml in the working directory if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from `path`, falling back to defaults if it is missing or invalid.
    ///
    /// Values that parse but cannot be used are replaced as described in [`Config::sanitized`].
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        match facet_toml::from_str::<Self>(&contents) {
            Ok(config) => config.sanitized(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }
        }
    }

    #[must_use]
    /// Replace settings that would break marker placement with their defaults.
    ///
    /// Pages must be at least one column wide, and the overlap tolerance must be a finite,
    /// non-negative distance smaller than the gap between neighbouring boundaries. Otherwise the
    /// dedup pass would merge markers sitting on adjacent boundaries.
    pub fn sanitized(mut self) -> Self {
        if self.page_width == 0 {
            warn!(
                page_width = self.page_width,
                default = DEFAULT_PAGE_WIDTH,
                "page width must be at least 1, using default"
            );
            self.page_width = DEFAULT_PAGE_WIDTH;
        }
        let pitch = UniformStrip::new(1, f64::from(self.page_width)).pitch();
        let tolerance = self.overlap_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 || tolerance >= pitch {
            warn!(
                overlap_tolerance = tolerance,
                pitch,
                default = DEFAULT_OVERLAP_TOLERANCE,
                "overlap tolerance must be below the boundary pitch, using default"
            );
            self.overlap_tolerance = DEFAULT_OVERLAP_TOLERANCE;
        }
        self
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
